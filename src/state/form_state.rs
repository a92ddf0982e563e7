//! Text-entry forms: sign-in, trading and wallet operations.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::OrderType;
use crate::api::CreateOrderRequest;
use crate::error::{Error, Result};

/// Minimum password length accepted by the sign-in forms.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Length of a two-factor one-time code.
pub const OTP_LEN: usize = 6;

/// Which form is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormKind {
    Login,
    Signup,
    TwoFactor,
    Trade { coin_id: String, side: OrderType },
    Deposit,
    Withdraw,
}

impl FormKind {
    pub fn title(&self) -> String {
        match self {
            Self::Login => "Sign In".into(),
            Self::Signup => "Create Account".into(),
            Self::TwoFactor => "Two-Factor Verification".into(),
            Self::Trade { coin_id, side } => match side {
                OrderType::Buy => format!("Buy {coin_id}"),
                OrderType::Sell => format!("Sell {coin_id}"),
            },
            Self::Deposit => "Deposit".into(),
            Self::Withdraw => "Withdraw".into(),
        }
    }

    /// Forms drawn as a popup over another screen.
    pub fn is_modal(&self) -> bool {
        matches!(self, Self::Deposit | Self::Withdraw)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
    /// Rendered masked.
    pub secret: bool,
}

impl FormField {
    fn text(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            secret: false,
        }
    }

    fn secret(label: &'static str) -> Self {
        Self {
            secret: true,
            ..Self::text(label)
        }
    }

    pub fn display_value(&self) -> String {
        if self.secret {
            "•".repeat(self.value.chars().count())
        } else {
            self.value.clone()
        }
    }
}

/// A validated form, ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub enum FormSubmission {
    Login {
        email: String,
        password: String,
    },
    Signup {
        full_name: String,
        email: String,
        password: String,
    },
    TwoFactor {
        code: String,
    },
    Trade(CreateOrderRequest),
    Deposit(Decimal),
    Withdraw(Decimal),
}

/// An open form and its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focus: usize,
    /// Last validation failure.
    pub error: Option<String>,
}

impl Form {
    pub fn new(kind: FormKind) -> Self {
        let fields = match &kind {
            FormKind::Login => vec![FormField::text("Email"), FormField::secret("Password")],
            FormKind::Signup => vec![
                FormField::text("Full name"),
                FormField::text("Email"),
                FormField::secret("Password"),
            ],
            FormKind::TwoFactor => vec![FormField::text("Code")],
            FormKind::Trade { .. } => vec![FormField::text("Quantity")],
            FormKind::Deposit | FormKind::Withdraw => vec![FormField::text("Amount (USD)")],
        };

        Self {
            kind,
            fields,
            focus: 0,
            error: None,
        }
    }

    pub fn value(&self, index: usize) -> &str {
        self.fields.get(index).map_or("", |f| f.value.as_str())
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.push(c);
        }
        self.error = None;
    }

    pub fn pop_char(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len().max(1);
    }

    pub fn prev_field(&mut self) {
        let len = self.fields.len().max(1);
        self.focus = (self.focus + len - 1) % len;
    }

    /// Validate the input and turn it into a submission.
    pub fn submit(&self) -> Result<FormSubmission> {
        match &self.kind {
            FormKind::Login => Ok(FormSubmission::Login {
                email: validate_email(self.value(0))?,
                password: validate_password(self.value(1))?,
            }),
            FormKind::Signup => {
                let full_name = self.value(0).trim();
                if full_name.is_empty() {
                    return Err(Error::invalid_input("Full name is required"));
                }
                Ok(FormSubmission::Signup {
                    full_name: full_name.to_string(),
                    email: validate_email(self.value(1))?,
                    password: validate_password(self.value(2))?,
                })
            }
            FormKind::TwoFactor => {
                let code = self.value(0).trim();
                if code.len() != OTP_LEN || !code.chars().all(|c| c.is_ascii_digit()) {
                    return Err(Error::invalid_input(format!(
                        "Code must be {OTP_LEN} digits"
                    )));
                }
                Ok(FormSubmission::TwoFactor {
                    code: code.to_string(),
                })
            }
            FormKind::Trade { coin_id, side } => Ok(FormSubmission::Trade(CreateOrderRequest {
                coin_id: coin_id.clone(),
                quantity: positive_decimal(self.value(0), "Quantity")?,
                order_type: *side,
            })),
            FormKind::Deposit => Ok(FormSubmission::Deposit(positive_decimal(
                self.value(0),
                "Amount",
            )?)),
            FormKind::Withdraw => Ok(FormSubmission::Withdraw(positive_decimal(
                self.value(0),
                "Amount",
            )?)),
        }
    }
}

fn validate_email(raw: &str) -> Result<String> {
    let email = raw.trim();
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
    });
    if valid && !email.contains(char::is_whitespace) {
        Ok(email.to_string())
    } else {
        Err(Error::invalid_input("Invalid email format"))
    }
}

fn validate_password(raw: &str) -> Result<String> {
    if raw.chars().count() < MIN_PASSWORD_LEN {
        return Err(Error::invalid_input(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(raw.to_string())
}

fn positive_decimal(raw: &str, what: &str) -> Result<Decimal> {
    let cleaned = raw.trim().trim_start_matches('$').replace(',', "");
    let value = Decimal::from_str(&cleaned)
        .map_err(|_| Error::invalid_input(format!("{what} must be a number")))?;
    if value <= Decimal::ZERO {
        return Err(Error::invalid_input(format!("{what} must be greater than zero")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn filled(kind: FormKind, values: &[&str]) -> Form {
        let mut form = Form::new(kind);
        for (i, value) in values.iter().enumerate() {
            form.focus = i;
            value.chars().for_each(|c| form.push_char(c));
        }
        form
    }

    #[test]
    fn test_login_validation() {
        let ok = filled(FormKind::Login, &["ada@example.com", "secret1"]);
        assert_eq!(
            ok.submit().unwrap(),
            FormSubmission::Login {
                email: "ada@example.com".into(),
                password: "secret1".into()
            }
        );

        let bad_email = filled(FormKind::Login, &["ada.example.com", "secret1"]);
        assert_eq!(
            bad_email.submit().unwrap_err().user_message(),
            "Invalid email format"
        );

        let short = filled(FormKind::Login, &["ada@example.com", "abc"]);
        assert!(short.submit().is_err());
    }

    #[test]
    fn test_signup_requires_name() {
        let form = filled(FormKind::Signup, &["  ", "ada@example.com", "secret1"]);
        assert_eq!(
            form.submit().unwrap_err().user_message(),
            "Full name is required"
        );
    }

    #[test]
    fn test_otp_must_be_six_digits() {
        assert!(filled(FormKind::TwoFactor, &["12345"]).submit().is_err());
        assert!(filled(FormKind::TwoFactor, &["12345a"]).submit().is_err());
        assert_eq!(
            filled(FormKind::TwoFactor, &["123456"]).submit().unwrap(),
            FormSubmission::TwoFactor {
                code: "123456".into()
            }
        );
    }

    #[test]
    fn test_trade_builds_order_request() {
        let kind = FormKind::Trade {
            coin_id: "bitcoin".into(),
            side: OrderType::Sell,
        };
        let form = filled(kind.clone(), &["0.25"]);
        assert_eq!(
            form.submit().unwrap(),
            FormSubmission::Trade(CreateOrderRequest {
                coin_id: "bitcoin".into(),
                quantity: dec!(0.25),
                order_type: OrderType::Sell,
            })
        );

        assert!(filled(kind.clone(), &["0"]).submit().is_err());
        assert!(filled(kind, &["lots"]).submit().is_err());
    }

    #[test]
    fn test_amounts_must_be_positive() {
        assert_eq!(
            filled(FormKind::Deposit, &["$1,250.50"]).submit().unwrap(),
            FormSubmission::Deposit(dec!(1250.50))
        );
        let err = filled(FormKind::Withdraw, &["-5"]).submit().unwrap_err();
        assert_eq!(err.user_message(), "Amount must be greater than zero");
    }

    #[test]
    fn test_focus_wraps_and_secret_masks() {
        let mut form = Form::new(FormKind::Login);
        form.prev_field();
        assert_eq!(form.focus, 1);
        form.next_field();
        assert_eq!(form.focus, 0);

        form.focus = 1;
        "pw".chars().for_each(|c| form.push_char(c));
        assert_eq!(form.fields[1].display_value(), "••");
        form.pop_char();
        assert_eq!(form.value(1), "p");
    }
}
