use std::sync::Arc;
use validator::Validate;

use crate::error::{ContactError, ContactResult};
use crate::mailer::ContactMailer;
use crate::models::ContactForm;

/// Service layer for contact-form business logic
#[derive(Clone)]
pub struct ContactService<M: ContactMailer> {
    mailer: Arc<M>,
}

impl<M: ContactMailer> ContactService<M> {
    pub fn new(mailer: M) -> Self {
        Self {
            mailer: Arc::new(mailer),
        }
    }

    /// Validate a submission and deliver it as one email
    pub async fn submit_form(&self, form: ContactForm) -> ContactResult<()> {
        form.validate()
            .map_err(|e| ContactError::Validation(e.to_string()))?;

        self.mailer.send(&form.subject(), &form.body()).await?;

        tracing::info!(full_name = %form.full_name, "Contact form submitted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::MockContactMailer;
    use mockall::predicate::eq;

    fn valid_form() -> ContactForm {
        ContactForm {
            full_name: "Ana García".to_string(),
            email: "ana@example.com".to_string(),
            phone: "+54 11 5555-0000".to_string(),
            message: "Hola".to_string(),
            zone: None,
            start_date: None,
            comments: None,
        }
    }

    #[tokio::test]
    async fn test_submit_sends_exactly_one_mail() {
        let mut mock_mailer = MockContactMailer::new();
        mock_mailer
            .expect_send()
            .with(
                eq("Ana García - Contacto"),
                eq("Nombre completo: Ana García\nEmail: ana@example.com\nTeléfono: +54 11 5555-0000\nMensaje: Hola"),
            )
            .times(1)
            .returning(|_, _| Ok(()));

        let service = ContactService::new(mock_mailer);
        service.submit_form(valid_form()).await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_form_never_reaches_the_mailer() {
        let mut mock_mailer = MockContactMailer::new();
        mock_mailer.expect_send().times(0);

        let service = ContactService::new(mock_mailer);

        let mut form = valid_form();
        form.email = "nope".to_string();

        let result = service.submit_form(form).await;
        assert!(matches!(result, Err(ContactError::Validation(_))));
    }

    #[tokio::test]
    async fn test_config_error_propagates() {
        let mut mock_mailer = MockContactMailer::new();
        mock_mailer.expect_send().returning(|_, _| {
            Err(ContactError::Config(
                "El email del remitente no está configurado".to_string(),
            ))
        });

        let service = ContactService::new(mock_mailer);

        let result = service.submit_form(valid_form()).await;
        assert!(matches!(result, Err(ContactError::Config(_))));
    }
}
