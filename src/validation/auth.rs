use crate::error::{AppError, Result};

/// Validates an email address.
///
/// # Arguments
///
/// * `email` - The email to validate.
///
/// # Returns
///
/// A `Result<()>` indicating whether the email is valid.
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(AppError::Validation(
            "Debes ingresar tu email".to_string(),
        ));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(AppError::Validation(
            "El email no tiene un formato válido".to_string(),
        ));
    };

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AppError::Validation(
            "El email no tiene un formato válido".to_string(),
        ));
    }

    Ok(())
}

/// Validates a new password against the platform policy.
///
/// Checked locally, before any network call, in this order: minimum length,
/// uppercase letter, digit, special character, confirmation match.
///
/// # Arguments
///
/// * `password` - The new password.
/// * `confirm` - The confirmation the user retyped.
///
/// # Returns
///
/// A `Result<()>` indicating whether the password satisfies the policy.
pub fn validate_new_password(password: &str, confirm: &str) -> Result<()> {
    if password.len() < 8 {
        return Err(AppError::Validation(
            "La contraseña debe tener al menos 8 caracteres".to_string(),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(AppError::Validation(
            "La contraseña debe incluir al menos una letra mayúscula".to_string(),
        ));
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(AppError::Validation(
            "La contraseña debe incluir al menos un número".to_string(),
        ));
    }

    if password.chars().all(|c| c.is_alphanumeric()) {
        return Err(AppError::Validation(
            "La contraseña debe incluir al menos un carácter especial".to_string(),
        ));
    }

    if password != confirm {
        return Err(AppError::Validation(
            "Las contraseñas no coinciden".to_string(),
        ));
    }

    Ok(())
}

/// Validates the login form before submitting it.
pub fn validate_login(email: &str, password: &str) -> Result<()> {
    validate_email(email)?;

    if password.is_empty() {
        return Err(AppError::Validation(
            "Debes ingresar tu contraseña".to_string(),
        ));
    }

    Ok(())
}

/// Ensures the given bytes are an image before uploading them as evidence.
///
/// # Arguments
///
/// * `bytes` - The candidate file content.
///
/// # Returns
///
/// A `Result` containing the detected MIME type.
pub fn ensure_image_bytes(bytes: &[u8]) -> Result<&'static str> {
    match infer::get(bytes) {
        Some(kind) if kind.mime_type().starts_with("image/") => Ok(kind.mime_type()),
        _ => Err(AppError::Validation(
            "Solo se permiten archivos de imagen".to_string(),
        )),
    }
}
