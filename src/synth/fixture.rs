use serde::{Deserialize, Serialize};

use crate::synth::values::{EMAIL_VALUE, PASSWORD_VALUE};

pub const FIXTURE_FILENAME: &str = "test_data.json";

pub const INVALID_EMAIL: &str = "invalid.user@example.com";
pub const INVALID_PASSWORD: &str = "WrongPass123!";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Test data loaded by the script as `testData`. `users[0]` logs in,
/// `users[1]` is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub users: Vec<Credentials>,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            users: vec![
                Credentials {
                    email: EMAIL_VALUE.to_string(),
                    password: PASSWORD_VALUE.to_string(),
                },
                Credentials {
                    email: INVALID_EMAIL.to_string(),
                    password: INVALID_PASSWORD.to_string(),
                },
            ],
        }
    }
}

impl Fixture {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
