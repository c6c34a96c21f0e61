// src/models/registration.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::{auth::User, payment::Payment, payment::PaymentMethod, school::School};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "registration_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "registration_payment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegistrationPaymentStatus {
    Pending,
    Paid,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: Uuid,

    #[schema(example = "María García")]
    pub full_name: String,

    #[schema(example = "1234567890")]
    pub document: String,

    #[schema(example = "estudiante@plataforma.edu.co")]
    pub email: String,

    #[schema(example = "3001112233")]
    pub phone: String,

    #[schema(value_type = Option<String>, format = Date, example = "2010-05-15")]
    pub birthdate: Option<NaiveDate>,

    pub gender: Option<String>,
    pub address: Option<String>,
    pub school_id: Option<Uuid>,

    #[schema(example = 6)]
    pub grade: i32,

    #[schema(example = "6° Bachillerato")]
    pub grade_name: String,

    #[schema(example = "Ana López")]
    pub guardian_name: String,

    #[schema(example = "3002223344")]
    pub guardian_phone: String,

    pub guardian_email: Option<String>,

    pub payment_method: PaymentMethod,

    #[schema(example = "150000.00")]
    pub amount: Decimal,

    pub status: RegistrationStatus,
    pub payment_status: RegistrationPaymentStatus,

    pub user_id: Option<Uuid>,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

// Matrícula com colégio e pagamentos embutidos (listagens e transições)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationView {
    #[serde(flatten)]
    pub registration: Registration,
    pub school: Option<School>,
    pub payments: Vec<Payment>,
}

// Versão com o usuário vinculado (consulta individual do admin)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationDetail {
    #[serde(flatten)]
    pub registration: Registration,
    pub school: Option<School>,
    pub payments: Vec<Payment>,
    pub user: Option<User>,
}

fn default_amount() -> Decimal {
    Decimal::new(150_000, 0)
}

fn validate_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if amount.is_sign_positive() && !amount.is_zero() {
        return Ok(());
    }
    let mut error = ValidationError::new("amount");
    error.message = Some("El monto debe ser positivo".into());
    Err(error)
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    #[validate(length(min = 3, message = "El nombre completo debe tener al menos 3 caracteres"))]
    #[schema(example = "María García")]
    pub full_name: String,

    #[validate(length(min = 5, message = "El documento debe tener al menos 5 caracteres"))]
    #[schema(example = "1234567890")]
    pub document: String,

    #[validate(email(message = "El correo no es válido"))]
    #[schema(example = "estudiante@plataforma.edu.co")]
    pub email: String,

    #[validate(length(min = 6, message = "El teléfono debe tener al menos 6 caracteres"))]
    #[schema(example = "3001112233")]
    pub phone: String,

    #[schema(value_type = Option<String>, format = Date, example = "2010-05-15")]
    pub birthdate: Option<NaiveDate>,

    pub gender: Option<String>,
    pub address: Option<String>,
    pub school_id: Option<Uuid>,

    #[schema(example = 6)]
    pub grade: i32,

    #[validate(length(min = 1, message = "El nombre del grado es requerido"))]
    #[schema(example = "6° Bachillerato")]
    pub grade_name: String,

    #[validate(length(min = 3, message = "El nombre del acudiente debe tener al menos 3 caracteres"))]
    #[schema(example = "Ana López")]
    pub guardian_name: String,

    #[validate(length(min = 5, message = "El teléfono del acudiente debe tener al menos 5 caracteres"))]
    #[schema(example = "3002223344")]
    pub guardian_phone: String,

    #[validate(email(message = "El correo del acudiente no es válido"))]
    pub guardian_email: Option<String>,

    pub payment_method: PaymentMethod,

    #[serde(default = "default_amount")]
    #[validate(custom(function = "validate_amount"))]
    #[schema(example = "150000.00")]
    pub amount: Decimal,
}

// O `status` é opcional no wire para respondermos "Estado requerido".
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdatePayload {
    pub status: Option<RegistrationStatus>,
}
