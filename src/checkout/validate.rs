use std::{collections::BTreeMap, sync::LazyLock};

use regex::Regex;
use serde::Deserialize;

use super::phone;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

/// Raw field values as posted by the checkout form.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CheckoutForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub coupon_code: Option<String>,
    pub seller_code: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Field {
    Name,
    Email,
    Phone,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors(BTreeMap<Field, &'static str>);

impl FieldErrors {
    pub fn get(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).copied()
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

/// Checks every field on each call; the returned set replaces whatever was shown before.
pub fn validate(form: &CheckoutForm) -> Result<(), FieldErrors> {
    let mut errors = BTreeMap::new();

    if form.name.trim().chars().count() < 2 {
        errors.insert(Field::Name, "Por favor, insira seu nome completo.");
    }
    if !is_valid_email(&form.email) {
        errors.insert(Field::Email, "Por favor, insira um email válido.");
    }
    if let Some(raw) = &form.phone {
        if !phone::is_valid(raw) {
            errors.insert(
                Field::Phone,
                "Por favor, insira um telefone válido com DDD (10 ou 11 dígitos).",
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(FieldErrors(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, email: &str, phone: Option<&str>) -> CheckoutForm {
        CheckoutForm {
            name: name.into(),
            email: email.into(),
            phone: phone.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn name_needs_two_characters_after_trim() {
        let errors = validate(&form(" J ", "jane@x.com", None)).unwrap_err();
        assert!(errors.get(Field::Name).is_some());
        assert!(errors.get(Field::Email).is_none());
        assert!(errors.get(Field::Phone).is_none());

        assert!(validate(&form("Jo", "jane@x.com", None)).is_ok());
        assert!(validate(&form("Zé", "jane@x.com", None)).is_ok());
    }

    #[test]
    fn email_pattern() {
        assert!(is_valid_email("a@b.c"));
        assert!(is_valid_email(" jane@x.com "));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("jane@x"));
        assert!(!is_valid_email("ja ne@x.com"));
    }

    #[test]
    fn phone_only_checked_when_present() {
        assert!(validate(&form("Jane", "jane@x.com", None)).is_ok());
        assert!(validate(&form("Jane", "jane@x.com", Some("(11) 3333-4444"))).is_ok());
        assert!(validate(&form("Jane", "jane@x.com", Some("11987654321"))).is_ok());

        let errors = validate(&form("Jane", "jane@x.com", Some("119876543"))).unwrap_err();
        assert!(errors.get(Field::Phone).is_some());
    }

    #[test]
    fn optional_fields_never_block() {
        let mut form = form("Jane Doe", "jane@x.com", Some("11987654321"));
        form.coupon_code = Some("  ".into());
        form.seller_code = Some(String::new());
        assert!(validate(&form).is_ok());
    }

    #[test]
    fn reports_every_failing_field() {
        let errors = validate(&form("", "nope", Some("1"))).unwrap_err();
        assert!(errors.get(Field::Name).is_some());
        assert!(errors.get(Field::Email).is_some());
        assert!(errors.get(Field::Phone).is_some());
    }
}
