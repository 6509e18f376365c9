//! Request types for the ledger web server.
//!
//! HTML forms arrive as strings and are parsed here into typed values, so a
//! bad field becomes a [`LedgerError::Validation`] naming that field instead
//! of an opaque extractor rejection.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::auth::hash_password;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{EntryFields, InvoicePeriod, NewUser, Role, UserRates, normalize_email};

fn parse_date(field: &str, value: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| LedgerError::validation(field, format!("'{}' is not a YYYY-MM-DD date", value.trim())))
}

/// Parses a package count. Blank means zero.
fn parse_packages(value: &str) -> LedgerResult<u32> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }
    match value.parse::<i64>() {
        Ok(n) if n < 0 => Err(LedgerError::validation("packages", "must not be negative")),
        Ok(n) => u32::try_from(n).map_err(|_| LedgerError::validation("packages", "is too large")),
        Err(_) => Err(LedgerError::validation(
            "packages",
            format!("'{}' is not a whole number", value),
        )),
    }
}

/// Parses a non-negative decimal. Blank yields `default`.
fn parse_non_negative(field: &str, value: &str, default: Decimal) -> LedgerResult<Decimal> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(default);
    }
    let parsed = Decimal::from_str(value)
        .map_err(|_| LedgerError::validation(field, format!("'{}' is not a number", value)))?;
    ensure_non_negative(field, parsed)
}

fn ensure_non_negative(field: &str, value: Decimal) -> LedgerResult<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(LedgerError::validation(field, "must not be negative"));
    }
    Ok(value)
}

/// Largest accepted amount per package.
pub const MAX_PRICE_PER_PKG: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Largest accepted superannuation rate (1000%).
pub const MAX_SUPER_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

/// Largest accepted van rent deduction.
pub const MAX_VAN_RENT: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

fn ensure_at_most(field: &str, value: Decimal, max: Decimal) -> LedgerResult<Decimal> {
    if value > max {
        return Err(LedgerError::validation(field, format!("must not exceed {}", max)));
    }
    Ok(value)
}

fn parse_rate(field: &str, value: &str, max: Decimal) -> LedgerResult<Decimal> {
    ensure_at_most(field, parse_non_negative(field, value, Decimal::ZERO)?, max)
}

/// Checks a van rent: non-negative, bounded, and in whole cents so the
/// amount shown on the invoice is the amount deducted.
fn ensure_van_rent(value: Decimal) -> LedgerResult<Decimal> {
    let value = ensure_at_most("van_rent", ensure_non_negative("van_rent", value)?, MAX_VAN_RENT)?;
    if value.normalize().scale() > 2 {
        return Err(LedgerError::validation("van_rent", "must be in whole cents"));
    }
    Ok(value)
}

fn parse_optional_id(field: &str, value: &str) -> LedgerResult<Option<i64>> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value
        .parse::<i64>()
        .map(Some)
        .map_err(|_| LedgerError::validation(field, format!("'{}' is not a valid id", value)))
}

fn required<'a>(field: &str, value: &'a str) -> LedgerResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(LedgerError::validation(field, "is required"));
    }
    Ok(value)
}

/// Body of `POST /login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    /// Login email, normalized before lookup.
    #[serde(default)]
    pub email: String,
    /// Plain-text password.
    #[serde(default)]
    pub password: String,
}

/// Body of `POST /entry/new` and `POST /entry/:id/edit`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EntryForm {
    /// Target worker (admins creating on a worker's behalf). Blank means self.
    #[serde(default)]
    pub user_id: String,
    /// Work date as `YYYY-MM-DD`. Blank means today.
    #[serde(default)]
    pub work_date: String,
    /// Package count. Blank means zero.
    #[serde(default)]
    pub packages: String,
    /// Free-text note.
    #[serde(default)]
    pub notes: String,
}

impl EntryForm {
    /// Parses the entry fields, filling a blank date with `today`.
    ///
    /// # Example
    ///
    /// ```
    /// use courier_ledger::api::EntryForm;
    /// use chrono::NaiveDate;
    ///
    /// let today = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    /// let form = EntryForm { packages: "".into(), ..Default::default() };
    /// let fields = form.fields(today).unwrap();
    /// assert_eq!(fields.packages, 0);
    /// assert_eq!(fields.work_date, today);
    /// ```
    pub fn fields(&self, today: NaiveDate) -> LedgerResult<EntryFields> {
        let work_date = if self.work_date.trim().is_empty() {
            today
        } else {
            parse_date("work_date", &self.work_date)?
        };

        Ok(EntryFields {
            work_date,
            packages: parse_packages(&self.packages)?,
            notes: self.notes.trim().to_string(),
        })
    }

    /// The requested owner, if one was chosen.
    pub fn target_user(&self) -> LedgerResult<Option<i64>> {
        parse_optional_id("user_id", &self.user_id)
    }
}

/// Body of `POST /admin/entry/:id/comment`.
#[derive(Debug, Clone, Deserialize)]
pub struct CommentForm {
    /// The new admin comment; blank clears it.
    #[serde(default)]
    pub admin_comment: String,
}

/// Body of `POST /admin/users`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateUserForm {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Initial password.
    #[serde(default)]
    pub password: String,
    /// `admin` or `worker`; blank means worker.
    #[serde(default)]
    pub role: String,
    /// Amount paid per package; blank means zero.
    #[serde(default)]
    pub price_per_pkg: String,
    /// Superannuation rate as a fraction; blank means zero.
    #[serde(default)]
    pub super_rate: String,
}

impl CreateUserForm {
    /// Validates the form and hashes the password.
    pub fn into_new_user(self, bcrypt_cost: u32) -> LedgerResult<NewUser> {
        let name = required("name", &self.name)?.to_string();
        let email = normalize_email(required("email", &self.email)?);
        if !email.contains('@') {
            return Err(LedgerError::validation("email", "must be an email address"));
        }
        if self.password.is_empty() {
            return Err(LedgerError::validation("password", "is required"));
        }

        let role = parse_role(&self.role)?;
        let price_per_pkg = parse_rate("price_per_pkg", &self.price_per_pkg, MAX_PRICE_PER_PKG)?;
        let super_rate = parse_rate("super_rate", &self.super_rate, MAX_SUPER_RATE)?;

        Ok(NewUser {
            name,
            email,
            password_hash: hash_password(&self.password, bcrypt_cost)?,
            role,
            price_per_pkg,
            super_rate,
        })
    }
}

fn parse_role(value: &str) -> LedgerResult<Role> {
    if value.trim().is_empty() {
        Ok(Role::default())
    } else {
        Role::from_str(value.trim())
    }
}

/// Body of `POST /admin/users/:id`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserForm {
    /// `admin` or `worker`; blank means worker.
    #[serde(default)]
    pub role: String,
    /// Amount paid per package; blank means zero.
    #[serde(default)]
    pub price_per_pkg: String,
    /// Superannuation rate as a fraction; blank means zero.
    #[serde(default)]
    pub super_rate: String,
}

impl TryFrom<UpdateUserForm> for UserRates {
    type Error = LedgerError;

    fn try_from(form: UpdateUserForm) -> LedgerResult<Self> {
        Ok(UserRates {
            role: parse_role(&form.role)?,
            price_per_pkg: parse_rate("price_per_pkg", &form.price_per_pkg, MAX_PRICE_PER_PKG)?,
            super_rate: parse_rate("super_rate", &form.super_rate, MAX_SUPER_RATE)?,
        })
    }
}

/// A validated invoice request, independent of how it arrived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceParams {
    /// Worker to invoice; `None` means the caller.
    pub user_id: Option<i64>,
    /// Inclusive date range.
    pub period: InvoicePeriod,
    /// Deduction for van rent.
    pub van_rent: Decimal,
}

/// Body of `POST /invoice` and query of `GET /invoice/pdf`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvoiceForm {
    /// Worker to invoice; blank means the caller.
    #[serde(default)]
    pub user_id: String,
    /// First day, `YYYY-MM-DD`.
    #[serde(default)]
    pub start: String,
    /// Last day (inclusive), `YYYY-MM-DD`.
    #[serde(default)]
    pub end: String,
    /// Van rent deduction; blank uses `default_van_rent`.
    #[serde(default)]
    pub van_rent: String,
}

impl InvoiceForm {
    /// Parses the form, rejecting a reversed range or a van rent that is
    /// negative or finer than a cent.
    pub fn params(&self, default_van_rent: Decimal) -> LedgerResult<InvoiceParams> {
        let start = parse_date("start", &self.start)?;
        let end = parse_date("end", &self.end)?;
        let van_rent = parse_non_negative("van_rent", &self.van_rent, default_van_rent)?;

        Ok(InvoiceParams {
            user_id: parse_optional_id("user_id", &self.user_id)?,
            period: InvoicePeriod::new(start, end)?,
            van_rent: ensure_van_rent(van_rent)?,
        })
    }
}

/// JSON body of `POST /api/invoice`.
///
/// # Example
///
/// ```json
/// { "user_id": 2, "start": "2026-03-01", "end": "2026-03-14", "van_rent": "100.00" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRequest {
    /// Worker to invoice; omitted means the caller.
    #[serde(default)]
    pub user_id: Option<i64>,
    /// First day of the period.
    pub start: NaiveDate,
    /// Last day of the period (inclusive).
    pub end: NaiveDate,
    /// Van rent deduction; omitted uses the configured default.
    #[serde(default)]
    pub van_rent: Option<Decimal>,
}

impl InvoiceRequest {
    /// Validates the request.
    pub fn params(&self, default_van_rent: Decimal) -> LedgerResult<InvoiceParams> {
        Ok(InvoiceParams {
            user_id: self.user_id,
            period: InvoicePeriod::new(self.start, self.end)?,
            van_rent: ensure_van_rent(self.van_rent.unwrap_or(default_van_rent))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn field_of(err: LedgerError) -> String {
        match err {
            LedgerError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_entry_form_parses_fields() {
        let form = EntryForm {
            user_id: String::new(),
            work_date: "2026-02-27".to_string(),
            packages: " 87 ".to_string(),
            notes: "  back gate  ".to_string(),
        };
        let fields = form.fields(today()).unwrap();
        assert_eq!(fields.work_date, NaiveDate::from_ymd_opt(2026, 2, 27).unwrap());
        assert_eq!(fields.packages, 87);
        assert_eq!(fields.notes, "back gate");
        assert_eq!(form.target_user().unwrap(), None);
    }

    #[test]
    fn test_negative_packages_rejected() {
        let form = EntryForm {
            packages: "-3".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(form.fields(today()).unwrap_err()), "packages");
    }

    #[test]
    fn test_fractional_packages_rejected() {
        let form = EntryForm {
            packages: "2.5".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(form.fields(today()).unwrap_err()), "packages");
    }

    #[test]
    fn test_bad_date_rejected() {
        let form = EntryForm {
            work_date: "02/03/2026".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(form.fields(today()).unwrap_err()), "work_date");
    }

    #[test]
    fn test_invoice_form_defaults_van_rent() {
        let form = InvoiceForm {
            user_id: "4".to_string(),
            start: "2026-03-01".to_string(),
            end: "2026-03-14".to_string(),
            van_rent: String::new(),
        };
        let params = form.params(Decimal::new(10000, 2)).unwrap();
        assert_eq!(params.user_id, Some(4));
        assert_eq!(params.van_rent, Decimal::new(100, 0));
    }

    #[test]
    fn test_invoice_form_rejects_negative_van_rent() {
        let form = InvoiceForm {
            start: "2026-03-01".to_string(),
            end: "2026-03-14".to_string(),
            van_rent: "-5".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(form.params(Decimal::ZERO).unwrap_err()), "van_rent");
    }

    #[test]
    fn test_van_rent_must_be_whole_cents() {
        let form = InvoiceForm {
            start: "2026-03-01".to_string(),
            end: "2026-03-14".to_string(),
            van_rent: "100.004".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(form.params(Decimal::ZERO).unwrap_err()), "van_rent");

        let request = InvoiceRequest {
            user_id: None,
            start: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            van_rent: Some(Decimal::new(100004, 3)),
        };
        assert_eq!(field_of(request.params(Decimal::ZERO).unwrap_err()), "van_rent");

        // trailing zeros are still whole cents
        let form = InvoiceForm {
            van_rent: "87.500".to_string(),
            ..form
        };
        assert_eq!(form.params(Decimal::ZERO).unwrap().van_rent, Decimal::new(875, 1));
    }

    #[test]
    fn test_invoice_form_rejects_huge_van_rent() {
        let form = InvoiceForm {
            start: "2026-03-01".to_string(),
            end: "2026-03-14".to_string(),
            van_rent: "79228162514264337593543950335".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(form.params(Decimal::ZERO).unwrap_err()), "van_rent");
    }

    #[test]
    fn test_invoice_form_rejects_reversed_range() {
        let form = InvoiceForm {
            start: "2026-03-14".to_string(),
            end: "2026-03-01".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(form.params(Decimal::ZERO).unwrap_err()), "end");
    }

    #[test]
    fn test_invoice_request_json() {
        let request: InvoiceRequest =
            serde_json::from_str(r#"{"start":"2026-03-01","end":"2026-03-14","van_rent":"80"}"#)
                .unwrap();
        let params = request.params(Decimal::new(100, 0)).unwrap();
        assert_eq!(params.user_id, None);
        assert_eq!(params.van_rent, Decimal::new(80, 0));
    }

    #[test]
    fn test_create_user_form_normalizes_and_defaults() {
        let form = CreateUserForm {
            name: " Ana ".to_string(),
            email: " Ana@Example.COM ".to_string(),
            password: "pw".to_string(),
            role: String::new(),
            price_per_pkg: "1.25".to_string(),
            super_rate: String::new(),
        };
        let user = form.into_new_user(4).unwrap();
        assert_eq!(user.name, "Ana");
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(user.role, Role::Worker);
        assert_eq!(user.price_per_pkg, Decimal::new(125, 2));
        assert_eq!(user.super_rate, Decimal::ZERO);
        assert_ne!(user.password_hash, "pw");
    }

    #[test]
    fn test_create_user_form_requires_fields() {
        let form = CreateUserForm {
            name: "Ana".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(form.into_new_user(4).unwrap_err()), "email");
    }

    #[test]
    fn test_update_form_rejects_negative_rate() {
        let form = UpdateUserForm {
            role: "worker".to_string(),
            price_per_pkg: "1".to_string(),
            super_rate: "-0.1".to_string(),
        };
        let err = UserRates::try_from(form).unwrap_err();
        assert_eq!(field_of(err), "super_rate");
    }

    #[test]
    fn test_rates_are_bounded() {
        let form = UpdateUserForm {
            role: "worker".to_string(),
            price_per_pkg: "79228162514264337593543950335".to_string(),
            super_rate: "0".to_string(),
        };
        assert_eq!(field_of(UserRates::try_from(form).unwrap_err()), "price_per_pkg");

        let form = CreateUserForm {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "pw".to_string(),
            super_rate: "10.01".to_string(),
            ..Default::default()
        };
        assert_eq!(field_of(form.into_new_user(4).unwrap_err()), "super_rate");

        let form = UpdateUserForm {
            role: "worker".to_string(),
            price_per_pkg: "1000000".to_string(),
            super_rate: "10".to_string(),
        };
        let rates = UserRates::try_from(form).unwrap();
        assert_eq!(rates.price_per_pkg, MAX_PRICE_PER_PKG);
        assert_eq!(rates.super_rate, MAX_SUPER_RATE);
    }
}
