use crate::{
    PaymentKind, PermissionId, ProductId, ProductImageId, ReportKind, RoleId,
    ReviewStatus, TicketPriority, TicketStatus, UserId,
};
use jiff::civil::Date;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const EMAIL_MAX_LEN: usize = 255;
pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 30;
pub const NAME_MAX_LEN: usize = 150;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 128;
pub const PHONE_MIN_DIGITS: usize = 7;
pub const PHONE_MAX_DIGITS: usize = 15;
pub const DESCRIPTION_MAX_LEN: usize = 2000;
pub const SKU_MAX_LEN: usize = 64;

/// Field name to message, as produced by local form validation.
pub type ValidationErrors = BTreeMap<&'static str, String>;

/// Synchronous, local validation of a form payload before it is submitted.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

/// Validation result for usernames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UsernameValidation {
    Valid,
    TooShort,
    TooLong,
    InvalidCharacters,
    MustStartWithLetter,
}

impl UsernameValidation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::Valid => None,
            Self::TooShort => Some("Username must be at least 3 characters"),
            Self::TooLong => Some("Username must be at most 30 characters"),
            Self::InvalidCharacters => Some(
                "Username can only contain letters, numbers, dots, dashes and underscores",
            ),
            Self::MustStartWithLetter => {
                Some("Username must start with a letter")
            }
        }
    }
}

/// Validate a username.
///
/// Rules:
/// - 3-30 characters
/// - ASCII letters, numbers, `.`, `-` and `_` only
/// - Must start with a letter
pub fn validate_username(username: &str) -> UsernameValidation {
    if username.len() < USERNAME_MIN_LEN {
        return UsernameValidation::TooShort;
    }
    if username.len() > USERNAME_MAX_LEN {
        return UsernameValidation::TooLong;
    }

    let mut chars = username.chars();

    if let Some(first) = chars.next()
        && !first.is_ascii_alphabetic()
    {
        return UsernameValidation::MustStartWithLetter;
    }

    for c in chars {
        if !c.is_ascii_alphanumeric() && !matches!(c, '_' | '.' | '-') {
            return UsernameValidation::InvalidCharacters;
        }
    }

    UsernameValidation::Valid
}

/// Returns an error message if the address is not a plausible email.
///
/// Accepts `local@domain.tld` with no whitespace, a single `@`, and a domain
/// containing at least one interior dot.
pub fn validate_email(email: &str) -> Option<&'static str> {
    if email.is_empty() {
        return Some("Email is required");
    }
    if email.len() > EMAIL_MAX_LEN {
        return Some("Email must be at most 255 characters");
    }
    if email.chars().any(char::is_whitespace) {
        return Some("Please enter a valid email address");
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Some("Please enter a valid email address");
    };
    let domain_ok = !domain.contains('@')
        && domain
            .split('.')
            .all(|label| !label.is_empty())
        && domain.contains('.');
    if local.is_empty() || !domain_ok {
        return Some("Please enter a valid email address");
    }
    None
}

/// Returns an error message if the phone number is malformed.
///
/// An optional leading `+`, then digits separated by spaces, dashes or
/// parentheses; 7 to 15 digits in total.
pub fn validate_phone(phone: &str) -> Option<&'static str> {
    let rest = phone.strip_prefix('+').unwrap_or(phone);
    if rest
        .chars()
        .any(|c| !(c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')')))
    {
        return Some("Phone number may only contain digits, spaces and dashes");
    }
    let digits = rest.chars().filter(char::is_ascii_digit).count();
    if !(PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits) {
        return Some("Phone number must have between 7 and 15 digits");
    }
    None
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordStrength {
    Strong,
    TooShort,
    TooLong,
    MissingUppercase,
    MissingLowercase,
    MissingDigit,
}

impl PasswordStrength {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Strong)
    }

    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            Self::Strong => None,
            Self::TooShort => Some("Password must be at least 8 characters"),
            Self::TooLong => Some("Password must be at most 128 characters"),
            Self::MissingUppercase => {
                Some("Password must contain an uppercase letter")
            }
            Self::MissingLowercase => {
                Some("Password must contain a lowercase letter")
            }
            Self::MissingDigit => Some("Password must contain a number"),
        }
    }
}

pub fn password_strength(password: &str) -> PasswordStrength {
    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        return PasswordStrength::TooShort;
    }
    if len > PASSWORD_MAX_LEN {
        return PasswordStrength::TooLong;
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return PasswordStrength::MissingUppercase;
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return PasswordStrength::MissingLowercase;
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return PasswordStrength::MissingDigit;
    }
    PasswordStrength::Strong
}

fn check_required(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    label: &str,
    max_len: usize,
) {
    let value = value.trim();
    if value.is_empty() {
        errors.insert(field, format!("{label} is required"));
    } else if value.chars().count() > max_len {
        errors.insert(
            field,
            format!("{label} must be at most {max_len} characters"),
        );
    }
}

fn check_optional(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: &str,
    label: &str,
    max_len: usize,
) {
    if value.chars().count() > max_len {
        errors.insert(
            field,
            format!("{label} must be at most {max_len} characters"),
        );
    }
}

fn finish(errors: ValidationErrors) -> Result<(), ValidationErrors> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl Validate for LoginCredentials {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.username.trim().is_empty() {
            errors.insert("username", "Username is required".into());
        }
        if self.password.is_empty() {
            errors.insert("password", "Password is required".into());
        }
        finish(errors)
    }
}

// Users

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub password: String,
    #[serde(default)]
    pub roles: Vec<RoleId>,
}

impl Validate for CreateUser {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(msg) = validate_username(&self.username).error_message() {
            errors.insert("username", msg.into());
        }
        if let Some(msg) = validate_email(&self.email) {
            errors.insert("email", msg.into());
        }
        check_required(
            &mut errors,
            "first_name",
            &self.first_name,
            "First name",
            NAME_MAX_LEN,
        );
        check_optional(
            &mut errors,
            "last_name",
            &self.last_name,
            "Last name",
            NAME_MAX_LEN,
        );
        if let Some(phone) = &self.phone
            && let Some(msg) = validate_phone(phone)
        {
            errors.insert("phone", msg.into());
        }
        if let Some(msg) = password_strength(&self.password).error_message() {
            errors.insert("password", msg.into());
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub roles: Vec<RoleId>,
}

impl Validate for UpdateUser {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(msg) = validate_email(&self.email) {
            errors.insert("email", msg.into());
        }
        check_required(
            &mut errors,
            "first_name",
            &self.first_name,
            "First name",
            NAME_MAX_LEN,
        );
        check_optional(
            &mut errors,
            "last_name",
            &self.last_name,
            "Last name",
            NAME_MAX_LEN,
        );
        if let Some(phone) = &self.phone
            && let Some(msg) = validate_phone(phone)
        {
            errors.insert("phone", msg.into());
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePassword {
    pub password: String,
}

impl Validate for ChangePassword {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(msg) = password_strength(&self.password).error_message() {
            errors.insert("password", msg.into());
        }
        finish(errors)
    }
}

// Roles and permissions

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoleDetails {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub permissions: Vec<PermissionId>,
}

impl Validate for RoleDetails {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "name", &self.name, "Name", NAME_MAX_LEN);
        check_optional(
            &mut errors,
            "description",
            &self.description,
            "Description",
            DESCRIPTION_MAX_LEN,
        );
        finish(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetPermissions {
    pub permissions: Vec<PermissionId>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionDetails {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub module: String,
    #[serde(default)]
    pub description: String,
}

impl Validate for PermissionDetails {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "code", &self.code, "Code", NAME_MAX_LEN);
        if !errors.contains_key("code")
            && !self
                .code
                .chars()
                .all(|c| c.is_ascii_lowercase() || matches!(c, '.' | '_'))
        {
            errors.insert(
                "code",
                "Code may only contain lowercase letters, dots and underscores"
                    .into(),
            );
        }
        check_required(&mut errors, "name", &self.name, "Name", NAME_MAX_LEN);
        check_optional(
            &mut errors,
            "description",
            &self.description,
            "Description",
            DESCRIPTION_MAX_LEN,
        );
        finish(errors)
    }
}

// Payment methods

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethodDetails {
    pub name: String,
    pub kind: PaymentKind,
    #[serde(default)]
    pub details: Option<String>,
}

impl Validate for PaymentMethodDetails {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "name", &self.name, "Name", NAME_MAX_LEN);
        if let Some(details) = &self.details {
            check_optional(
                &mut errors,
                "details",
                details,
                "Details",
                DESCRIPTION_MAX_LEN,
            );
        }
        finish(errors)
    }
}

// Reviews

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReviewStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewReview {
    pub product: ProductId,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewEdit {
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

fn check_rating(errors: &mut ValidationErrors, rating: u8) {
    if !(1..=5).contains(&rating) {
        errors.insert("rating", "Rating must be between 1 and 5".into());
    }
}

impl Validate for NewReview {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_rating(&mut errors, self.rating);
        check_optional(
            &mut errors,
            "comment",
            &self.comment,
            "Comment",
            DESCRIPTION_MAX_LEN,
        );
        finish(errors)
    }
}

impl Validate for ReviewEdit {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_rating(&mut errors, self.rating);
        check_optional(
            &mut errors,
            "comment",
            &self.comment,
            "Comment",
            DESCRIPTION_MAX_LEN,
        );
        finish(errors)
    }
}

// Products

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDetails {
    pub sku: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub price: Decimal,
    pub stock: i64,
}

impl Validate for ProductDetails {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_required(&mut errors, "sku", &self.sku, "SKU", SKU_MAX_LEN);
        check_required(&mut errors, "name", &self.name, "Name", NAME_MAX_LEN);
        check_optional(
            &mut errors,
            "description",
            &self.description,
            "Description",
            DESCRIPTION_MAX_LEN,
        );
        if self.price < Decimal::ZERO {
            errors.insert("price", "Price cannot be negative".into());
        }
        if self.stock < 0 {
            errors.insert("stock", "Stock cannot be negative".into());
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReorderImages {
    /// Every image id of the product, in the desired order.
    pub order: Vec<ProductImageId>,
}

// Support tickets

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TicketPriority>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketDetails {
    pub subject: String,
    #[serde(default)]
    pub description: String,
    pub customer: String,
    pub priority: TicketPriority,
}

impl Validate for TicketDetails {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_required(
            &mut errors,
            "subject",
            &self.subject,
            "Subject",
            NAME_MAX_LEN,
        );
        check_required(
            &mut errors,
            "customer",
            &self.customer,
            "Customer",
            NAME_MAX_LEN,
        );
        check_optional(
            &mut errors,
            "description",
            &self.description,
            "Description",
            DESCRIPTION_MAX_LEN,
        );
        finish(errors)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketUpdate {
    pub subject: String,
    #[serde(default)]
    pub description: String,
    pub priority: TicketPriority,
    pub status: TicketStatus,
}

impl Validate for TicketUpdate {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_required(
            &mut errors,
            "subject",
            &self.subject,
            "Subject",
            NAME_MAX_LEN,
        );
        check_optional(
            &mut errors,
            "description",
            &self.description,
            "Description",
            DESCRIPTION_MAX_LEN,
        );
        finish(errors)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignTicket {
    pub assignee: UserId,
}

// Reports

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportQuery {
    #[serde(skip)]
    pub kind: ReportKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<Date>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<Date>,
}

impl Validate for ReportQuery {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            errors.insert("to", "End date must not be before start date".into());
        }
        finish(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn usernames() {
        assert!(validate_username("alice").is_valid());
        assert!(validate_username("alice.smith-2").is_valid());
        assert_eq!(validate_username("al"), UsernameValidation::TooShort);
        assert_eq!(
            validate_username("1alice"),
            UsernameValidation::MustStartWithLetter
        );
        assert_eq!(
            validate_username("alice smith"),
            UsernameValidation::InvalidCharacters
        );
        assert_eq!(
            validate_username(&"a".repeat(31)),
            UsernameValidation::TooLong
        );
    }

    #[test]
    fn emails() {
        assert_eq!(validate_email("alice@example.com"), None);
        assert_eq!(validate_email("alice.smith+shop@mail.example.co"), None);
        assert!(validate_email("").is_some());
        assert!(validate_email("alice").is_some());
        assert!(validate_email("alice@example").is_some());
        assert!(validate_email("@example.com").is_some());
        assert!(validate_email("alice@@example.com").is_some());
        assert!(validate_email("alice@example..com").is_some());
        assert!(validate_email("ali ce@example.com").is_some());
    }

    #[test]
    fn phones() {
        assert_eq!(validate_phone("+34 600 123 456"), None);
        assert_eq!(validate_phone("(555) 123-4567"), None);
        assert!(validate_phone("12345").is_some());
        assert!(validate_phone("555-CALL-NOW").is_some());
        assert!(validate_phone("+1234567890123456").is_some());
    }

    #[test]
    fn passwords() {
        assert!(password_strength("Sup3rsecret").is_valid());
        assert_eq!(password_strength("Ab1"), PasswordStrength::TooShort);
        assert_eq!(
            password_strength("supersecret1"),
            PasswordStrength::MissingUppercase
        );
        assert_eq!(
            password_strength("SUPERSECRET1"),
            PasswordStrength::MissingLowercase
        );
        assert_eq!(
            password_strength("Supersecret"),
            PasswordStrength::MissingDigit
        );
    }

    #[test]
    fn create_user_collects_every_field_error() {
        let user = CreateUser {
            username: "x".into(),
            email: "nope".into(),
            first_name: "  ".into(),
            last_name: String::new(),
            phone: Some("12".into()),
            password: "short".into(),
            roles: vec![],
        };
        let errors = user.validate().unwrap_err();
        let fields: Vec<_> = errors.keys().copied().collect();
        assert_eq!(
            fields,
            vec!["email", "first_name", "password", "phone", "username"]
        );
    }

    #[test]
    fn valid_create_user() {
        let user = CreateUser {
            username: "carol".into(),
            email: "carol@example.com".into(),
            first_name: "Carol".into(),
            last_name: "Diaz".into(),
            phone: None,
            password: "Passw0rdOk".into(),
            roles: vec![RoleId(1)],
        };
        assert!(user.validate().is_ok());
    }

    #[test]
    fn product_bounds() {
        let product = ProductDetails {
            sku: "SKU-1".into(),
            name: "Mug".into(),
            price: Decimal::new(-1, 0),
            stock: -3,
            ..Default::default()
        };
        let errors = product.validate().unwrap_err();
        assert!(errors.contains_key("price"));
        assert!(errors.contains_key("stock"));
    }

    #[test]
    fn report_range_must_be_ordered() {
        let query = ReportQuery {
            kind: ReportKind::Sales,
            from: Some(jiff::civil::date(2025, 3, 1)),
            to: Some(jiff::civil::date(2025, 2, 1)),
        };
        assert!(query.validate().is_err());
    }

    #[test]
    fn filters_skip_unset_values() {
        let filters = UserFilters {
            search: Some("ali".into()),
            role: None,
            is_active: Some(false),
        };
        let value = serde_json::to_value(&filters).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"search": "ali", "is_active": false})
        );
    }
}
