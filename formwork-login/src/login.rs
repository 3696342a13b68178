//! The login form and the console session driving it.

use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicU64, Ordering};

use formwork::prelude::*;
use log::{debug, info, warn};
use thiserror::Error;

pub const GENDERS: [&str; 3] = ["Female", "Male", "Other"];

/// Fields of the login form, in prompt order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Email,
    Password,
    Gender,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Email, Field::Password, Field::Gender];

    /// Name the field is registered under.
    pub fn name(self) -> &'static str {
        match self {
            Field::Email => "email",
            Field::Password => "password",
            Field::Gender => "gender",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.name() == name)
    }

    fn prompt(self) -> String {
        match self {
            Field::Email => "Email: ".to_string(),
            Field::Password => "Password: ".to_string(),
            Field::Gender => {
                let options: Vec<_> = GENDERS
                    .iter()
                    .enumerate()
                    .map(|(i, label)| format!("{}) {}", i + 1, label))
                    .collect();
                format!("Gender [{}]: ", options.join(", "))
            }
        }
    }
}

/// Email, password and gender bound to a form validated on focus loss.
pub struct LoginForm {
    form: Form,
    email: Input,
    password: Input,
    gender: Select,
}

impl LoginForm {
    pub fn new(catalog: MessageCatalog) -> Result<Self, FormError> {
        let form = Form::new(FormConfig::new().on_focus_loss().catalog(catalog));
        let email = Input::with_placeholder("you@example.com");
        let password = Input::new();
        let gender = Select::with_options(GENDERS).placeholder("Select gender");

        let config = form.config();
        form.register_input(
            Field::Email.name(),
            config.rules("Email *").required(true).email().build(),
            email.clone(),
        )?;
        form.register_input(
            Field::Password.name(),
            config
                .rules("Password *")
                .required(true)
                .min_length(4)
                .max_length(8)
                .build(),
            password.clone(),
        )?;
        form.register_input(
            Field::Gender.name(),
            config.rules("Gender *").required(true).build(),
            gender.clone(),
        )?;

        Ok(Self {
            form,
            email,
            password,
            gender,
        })
    }

    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Feed one answer into a field the way a user would: focus it, replace
    /// its content, then move focus away. Returns the field's error, if any.
    pub fn enter(&self, field: Field, answer: &str) -> Option<String> {
        match field {
            Field::Email => Self::enter_text(&self.email, answer),
            Field::Password => Self::enter_text(&self.password, answer),
            Field::Gender => {
                self.gender.focus();
                match parse_choice(answer) {
                    Some(index) => self.gender.select(index),
                    None => self.gender.deselect(),
                }
                self.gender.blur();
                self.gender.error()
            }
        }
    }

    fn enter_text(input: &Input, answer: &str) -> Option<String> {
        input.focus();
        input.erase();
        input.type_text(answer);
        input.blur();
        input.error()
    }
}

/// Accepts a 1-based option number or a label, case-insensitively.
fn parse_choice(answer: &str) -> Option<usize> {
    let answer = answer.trim();
    if let Ok(n) = answer.parse::<usize>() {
        return (1..=GENDERS.len()).contains(&n).then(|| n - 1);
    }
    GENDERS
        .iter()
        .position(|label| label.eq_ignore_ascii_case(answer))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggedInUser {
    pub user_id: u64,
    pub display_name: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("invalid credentials for {0}")]
    InvalidCredentials(String),
}

/// Authentication backend the session hands validated credentials to.
pub trait LoginRepository {
    fn login(&self, email: &str, password: &str) -> Result<LoggedInUser, LoginError>;
}

/// Passwords the fake backend refuses.
const REJECTED_PASSWORDS: [&str; 3] = ["password", "1234", "qwerty"];

/// Accepts any account unless the password is one of a few well-known
/// ones. The user is named after the email's local part.
#[derive(Debug, Default)]
pub struct FakeLoginRepository {
    next_id: AtomicU64,
}

impl LoginRepository for FakeLoginRepository {
    fn login(&self, email: &str, password: &str) -> Result<LoggedInUser, LoginError> {
        if REJECTED_PASSWORDS.contains(&password) {
            return Err(LoginError::InvalidCredentials(email.to_string()));
        }
        let display_name = email.split('@').next().unwrap_or(email).to_string();
        Ok(LoggedInUser {
            user_id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            display_name,
        })
    }
}

/// How a session ended.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    LoggedIn(LoggedInUser),
    Rejected(LoginError),
    /// Input ended before the form was valid.
    Aborted,
}

/// Prompt for every field, re-prompting only the invalid ones after each
/// submit, until the form validates or `input` runs out.
pub fn run_session<R, W>(
    login: &LoginForm,
    repository: &dyn LoginRepository,
    mut input: R,
    mut out: W,
) -> io::Result<Outcome>
where
    R: BufRead,
    W: Write,
{
    let mut pending = Field::ALL.to_vec();

    loop {
        for field in &pending {
            write!(out, "{}", field.prompt())?;
            out.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                info!("Input closed before submit");
                return Ok(Outcome::Aborted);
            }

            let answer = line.trim_end_matches(['\r', '\n']);
            if let Some(error) = login.enter(*field, answer) {
                writeln!(out, "  ! {}", error)?;
            }
        }

        let result = login.form().validate_all();
        if result.is_valid() {
            break;
        }

        writeln!(out, "Please fix the following:")?;
        for error in result.errors() {
            writeln!(out, "  - {}", error.message)?;
        }
        pending = result
            .errors()
            .iter()
            .filter_map(|error| Field::from_name(&error.field_name))
            .collect();
        debug!("Re-prompting {} field(s)", pending.len());
    }

    let form = login.form();
    let email = form.value(Field::Email.name()).as_string("");
    let password = form.value(Field::Password.name()).as_string("");

    match repository.login(&email, &password) {
        Ok(user) => {
            info!("Logged in user {}", user.user_id);
            Ok(Outcome::LoggedIn(user))
        }
        Err(e) => {
            warn!("Login rejected: {}", e);
            form.set_error(Field::Email.name(), Some(e.to_string()));
            Ok(Outcome::Rejected(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn session(script: &str, repository: &dyn LoginRepository) -> (Outcome, String) {
        let login = LoginForm::new(MessageCatalog::default()).unwrap();
        let mut out = Vec::new();
        let outcome = run_session(&login, repository, Cursor::new(script), &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("1"), Some(0));
        assert_eq!(parse_choice(" 3 "), Some(2));
        assert_eq!(parse_choice("4"), None);
        assert_eq!(parse_choice("0"), None);
        assert_eq!(parse_choice("male"), Some(1));
        assert_eq!(parse_choice(""), None);
    }

    #[test]
    fn test_enter_validates_on_blur() {
        let login = LoginForm::new(MessageCatalog::default()).unwrap();

        assert_eq!(
            login.enter(Field::Email, "abc").as_deref(),
            Some("Email is invalid")
        );
        assert_eq!(login.enter(Field::Email, "a@b.c"), None);
        assert_eq!(
            login.enter(Field::Password, "abcdefghi").as_deref(),
            Some("Password must be between 4 and 8 characters")
        );
        assert_eq!(
            login.enter(Field::Gender, "x").as_deref(),
            Some("Gender is required")
        );
        assert_eq!(login.enter(Field::Gender, "2"), None);
        assert!(login.form().is_field_touched("gender"));
    }

    #[test]
    fn test_session_logs_in() {
        let repository = FakeLoginRepository::default();
        let (outcome, output) = session("me@example.com\nsecret\nfemale\n", &repository);

        assert_eq!(
            outcome,
            Outcome::LoggedIn(LoggedInUser {
                user_id: 1,
                display_name: "me".into(),
            })
        );
        assert!(output.starts_with("Email: Password: Gender [1) Female, 2) Male, 3) Other]: "));
    }

    #[test]
    fn test_session_reprompts_invalid_fields() {
        let repository = FakeLoginRepository::default();
        let script = "me@example.com\nab\n\nsecret\n3\n";
        let (outcome, output) = session(script, &repository);

        assert!(matches!(outcome, Outcome::LoggedIn(_)));
        assert!(output.contains("  ! Password must be between 4 and 8 characters"));
        assert!(output.contains("  - Gender is required"));
        assert_eq!(output.matches("Email: ").count(), 1);
        assert_eq!(output.matches("Password: ").count(), 2);
    }

    #[test]
    fn test_session_aborts_on_eof() {
        let repository = FakeLoginRepository::default();
        let (outcome, _) = session("me@example.com\n", &repository);
        assert_eq!(outcome, Outcome::Aborted);
    }

    #[test]
    fn test_session_rejected() {
        let repository = FakeLoginRepository::default();
        let (outcome, _) = session("me@example.com\npassword\n1\n", &repository);
        assert_eq!(
            outcome,
            Outcome::Rejected(LoginError::InvalidCredentials("me@example.com".into()))
        );
    }
}
