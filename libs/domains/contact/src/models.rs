use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// A contact-form submission.
///
/// Required fields always appear in the outgoing mail body; the optional
/// ones are included only when submitted, each on its own labeled line in
/// a fixed order.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ContactForm {
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub message: String,
    pub zone: Option<String>,
    pub start_date: Option<String>,
    pub comments: Option<String>,
}

impl ContactForm {
    /// Subject line of the outgoing mail
    pub fn subject(&self) -> String {
        format!("{} - Contacto", self.full_name)
    }

    /// Plain-text mail body: one labeled line per submitted field
    pub fn body(&self) -> String {
        let mut lines = vec![
            format!("Nombre completo: {}", self.full_name),
            format!("Email: {}", self.email),
            format!("Teléfono: {}", self.phone),
        ];
        if let Some(zone) = &self.zone {
            lines.push(format!("Zona: {zone}"));
        }
        if let Some(start_date) = &self.start_date {
            lines.push(format!("Fecha de inicio: {start_date}"));
        }
        lines.push(format!("Mensaje: {}", self.message));
        if let Some(comments) = &self.comments {
            lines.push(format!("Comentarios: {comments}"));
        }
        lines.join("\n")
    }
}

/// Acknowledgment body returned to the storefront
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_form() -> ContactForm {
        ContactForm {
            full_name: "Ana García".to_string(),
            email: "ana@example.com".to_string(),
            phone: "+54 11 5555-0000".to_string(),
            message: "Necesito un presupuesto".to_string(),
            zone: None,
            start_date: None,
            comments: None,
        }
    }

    #[test]
    fn test_subject_format() {
        assert_eq!(base_form().subject(), "Ana García - Contacto");
    }

    #[test]
    fn test_body_contains_required_fields_in_order() {
        let body = base_form().body();
        assert_eq!(
            body,
            "Nombre completo: Ana García\n\
             Email: ana@example.com\n\
             Teléfono: +54 11 5555-0000\n\
             Mensaje: Necesito un presupuesto"
        );
    }

    #[test]
    fn test_body_includes_optional_fields_when_present() {
        let mut form = base_form();
        form.zone = Some("Palermo".to_string());
        form.start_date = Some("2026-09-15".to_string());
        form.comments = Some("Llamar por la tarde".to_string());

        let body = form.body();
        let lines: Vec<&str> = body.lines().collect();
        assert_eq!(lines[3], "Zona: Palermo");
        assert_eq!(lines[4], "Fecha de inicio: 2026-09-15");
        assert_eq!(lines[5], "Mensaje: Necesito un presupuesto");
        assert_eq!(lines[6], "Comentarios: Llamar por la tarde");
    }

    #[test]
    fn test_validation_rejects_bad_email() {
        let mut form = base_form();
        form.email = "not-an-email".to_string();
        assert!(form.validate().is_err());
    }

    #[test]
    fn test_validation_requires_full_name() {
        let mut form = base_form();
        form.full_name = String::new();
        assert!(form.validate().is_err());
    }
}
