use crate::dom::descriptor::ElementDescriptor;

pub const EMAIL_VALUE: &str = "test.user@example.com";
pub const PASSWORD_VALUE: &str = "TestPassword123!";
pub const USERNAME_VALUE: &str = "testuser2025";
pub const PHONE_VALUE: &str = "555-123-4567";
pub const NUMBER_VALUE: &str = "42";
pub const DEFAULT_VALUE: &str = "Test Input Value";

/// Name/placeholder keyword groups, checked in order.
const KEYWORD_TABLE: [(&[&str], &str); 4] = [
    (&["email", "e-mail"], EMAIL_VALUE),
    (&["password", "pwd"], PASSWORD_VALUE),
    (&["username", "user", "login"], USERNAME_VALUE),
    (&["phone", "mobile", "tel"], PHONE_VALUE),
];

/// Realistic input value for a field.
///
/// Name and placeholder keywords win over the declared type; the result is
/// never empty and depends only on the three inputs.
pub fn synthesize_value(name: &str, placeholder: &str, input_type: &str) -> &'static str {
    let name = name.to_lowercase();
    let placeholder = placeholder.to_lowercase();

    for (keywords, value) in KEYWORD_TABLE {
        if keywords
            .iter()
            .any(|k| name.contains(k) || placeholder.contains(k))
        {
            return value;
        }
    }

    match input_type.to_lowercase().as_str() {
        "email" => EMAIL_VALUE,
        "password" => PASSWORD_VALUE,
        "number" => NUMBER_VALUE,
        _ => DEFAULT_VALUE,
    }
}

pub fn value_for(descriptor: &ElementDescriptor) -> &'static str {
    synthesize_value(&descriptor.name, &descriptor.placeholder, &descriptor.input_type)
}
