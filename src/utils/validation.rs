use crate::error::{AppError, AppResult};

pub fn required(value: &str, field: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidInput(format!("Field {} is required", field)));
    }
    Ok(())
}

pub fn min_len(value: &str, min: usize, field: &str) -> AppResult<()> {
    if value.chars().count() < min {
        return Err(AppError::InvalidInput(format!(
            "Field {} must be at least {} characters long",
            field, min
        )));
    }
    Ok(())
}

pub fn len_between(value: &str, min: usize, max: usize, field: &str) -> AppResult<()> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::InvalidInput(if min == max {
            format!("Field {} must be exactly {} characters long", field, min)
        } else {
            format!(
                "Field {} must be between {} and {} characters long",
                field, min, max
            )
        }));
    }
    Ok(())
}

pub fn email(value: &str, field: &str) -> AppResult<()> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(AppError::InvalidInput(format!(
            "Field {} must be a valid email address",
            field
        )));
    }
    Ok(())
}
