use validator::Validate;

use crate::{EmailParams, ServiceType};

#[derive(Validate, Clone, Debug, Default, PartialEq, Eq)]
pub struct ContactForm {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 2000))]
    pub message: String,
    pub service_type: Option<ServiceType>,
}

impl ContactForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            message: message.into(),
            service_type: None,
        }
    }

    pub fn service_type(mut self, service_type: ServiceType) -> Self {
        self.service_type = Some(service_type);
        self
    }

    pub fn is_complete(&self) -> bool {
        self.validate().is_ok()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn to_email_params(&self) -> EmailParams {
        EmailParams {
            from_name: self.name.to_owned(),
            from_email: self.email.to_owned(),
            message: self.message.to_owned(),
            service_type: self.service_type.map(|s| s.to_string()),
            to_name: None,
        }
    }
}

/// A form may only be dispatched once every required field validates and
/// the challenge has been solved.
pub fn can_submit(form: &ContactForm, challenge_response_valid: bool) -> bool {
    challenge_response_valid && form.is_complete()
}
