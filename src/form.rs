use std::collections::HashMap;

use serde::Deserialize;

/// Contact form fields as they arrive, any of them possibly absent.
#[derive(Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactFields {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub mobile: Option<String>,
    pub password: Option<String>,
    pub address: Option<String>,
}

/// A contact form with every required field present and non-empty.
///
/// Values are kept verbatim: no trimming, no format checks for email or mobile.
pub struct ContactForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
    pub address: String,
}

impl ContactFields {
    /// Picks the known fields out of a multipart text field map.
    pub fn from_map(mut fields: HashMap<String, String>) -> ContactFields {
        ContactFields {
            first_name: fields.remove("firstName"),
            last_name: fields.remove("lastName"),
            email: fields.remove("email"),
            mobile: fields.remove("mobile"),
            password: fields.remove("password"),
            address: fields.remove("address"),
        }
    }

    pub fn validate(self) -> Option<ContactForm> {
        Some(ContactForm {
            first_name: required(self.first_name)?,
            last_name: required(self.last_name)?,
            email: required(self.email)?,
            mobile: required(self.mobile)?,
            password: required(self.password)?,
            address: required(self.address)?,
        })
    }
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use map_macro::hash_map;

    use super::ContactFields;

    const FIELD_NAMES: [&str; 6] = [
        "firstName", "lastName", "email", "mobile", "password", "address",
    ];

    fn complete() -> HashMap<String, String> {
        hash_map! {
            "firstName".to_string() => "Grace".to_string(),
            "lastName".to_string() => "Hopper".to_string(),
            "email".to_string() => "not-an-email".to_string(),
            "mobile".to_string() => "555".to_string(),
            "password".to_string() => "cobol".to_string(),
            "address".to_string() => "Arlington, VA".to_string(),
        }
    }

    #[test]
    fn complete_form_is_valid() {
        let form = ContactFields::from_map(complete()).validate().unwrap();

        assert_eq!(form.first_name, "Grace");
        assert_eq!(form.email, "not-an-email");
        assert_eq!(form.address, "Arlington, VA");
    }

    #[test]
    fn any_missing_field_fails() {
        for name in FIELD_NAMES {
            let mut fields = complete();
            fields.remove(name);

            assert!(
                ContactFields::from_map(fields).validate().is_none(),
                "form without {name} was accepted"
            );
        }
    }

    #[test]
    fn empty_field_counts_as_missing() {
        let mut fields = complete();
        fields.insert("mobile".to_string(), String::new());

        assert!(ContactFields::from_map(fields).validate().is_none());
    }

    #[test]
    fn values_are_not_trimmed() {
        let mut fields = complete();
        fields.insert("lastName".to_string(), "  Hopper ".to_string());

        let form = ContactFields::from_map(fields).validate().unwrap();
        assert_eq!(form.last_name, "  Hopper ");
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let mut fields = complete();
        fields.insert("newsletter".to_string(), "yes".to_string());

        assert!(ContactFields::from_map(fields).validate().is_some());
    }

    #[test]
    fn deserializes_camel_case_json() {
        let fields: ContactFields = serde_json::from_str(
            r#"{"firstName": "Grace", "lastName": "Hopper", "email": "g@navy.mil",
                "mobile": "555", "password": "cobol", "address": null}"#,
        )
        .unwrap();

        assert_eq!(fields.first_name.as_deref(), Some("Grace"));
        assert!(fields.validate().is_none());
    }
}
