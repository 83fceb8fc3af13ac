//! Username and password for the mosaic server

use std::fmt;

use console::Term;

use crate::error::Error;

/// Environment variable holding the username
pub const USER_ENV: &str = "CW_USER";
/// Environment variable holding the password
pub const PASSWORD_ENV: &str = "CW_PSWD";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    user: String,
    password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .finish()
    }
}

impl Credentials {
    pub fn new<U: Into<String>, P: Into<String>>(user: U, password: P) -> Self {
        Credentials {
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Find credentials, in order of precedence:
    /// 1. `user` and `password`, when both are given
    /// 2. the `CW_USER` and `CW_PSWD` environment variables
    /// 3. asking on the terminal
    pub fn resolve(user: Option<&str>, password: Option<&str>) -> Result<Self, Error> {
        Self::resolve_with(user, password, |key| std::env::var(key).ok(), prompt)
    }

    /// [`resolve`](Self::resolve) with the environment lookup and the prompt
    /// supplied by the caller
    pub fn resolve_with<E, P>(
        user: Option<&str>,
        password: Option<&str>,
        env: E,
        prompt: P,
    ) -> Result<Self, Error>
    where
        E: Fn(&str) -> Option<String>,
        P: FnOnce() -> Result<Self, Error>,
    {
        // empty values count as missing
        let user = user.filter(|s| !s.is_empty());
        let password = password.filter(|s| !s.is_empty());
        if let (Some(user), Some(password)) = (user, password) {
            log::debug!("Using the username and password given as arguments");
            return Ok(Credentials::new(user, password));
        }

        let from_env = |key: &str| env(key).filter(|s: &String| !s.is_empty());
        if let (Some(user), Some(password)) = (from_env(USER_ENV), from_env(PASSWORD_ENV)) {
            log::debug!("Using the username and password from {} and {}", USER_ENV, PASSWORD_ENV);
            return Ok(Credentials { user, password });
        }

        log::info!("No username/password found in arguments or environment variables");
        prompt()
    }
}

/// Ask for the username and, without echo, the password
fn prompt() -> Result<Credentials, Error> {
    let term = Term::stderr();
    if !term.is_term() {
        return Err(Error::MissingCredentials);
    }

    term.write_str("Username: ")?;
    let user = term.read_line()?;
    term.write_str("Password: ")?;
    let password = term.read_secure_line()?;

    Ok(Credentials::new(user.trim(), password))
}
