//! Command construction.
//!
//! Commands are argument vectors handed straight to the operating system,
//! never to an intermediate shell. PowerShell scripts embed every caller
//! supplied string as a single-quoted literal.

use std::fmt;

/// Executable used for PowerShell commands.
pub const POWERSHELL: &str = "powershell.exe";

/// Placeholder shown instead of secret values.
pub const REDACTED: &str = "********";

/// A program plus its arguments, ready to be executed.
///
/// `display` is a human-readable rendering used for logging, with
/// secrets replaced by [`REDACTED`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    program: String,
    args: Vec<String>,
    display: String,
}

impl CommandLine {
    pub fn new<S: Into<String>>(program: &str, args: impl IntoIterator<Item = S>) -> Self {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        let display = std::iter::once(program.to_string())
            .chain(args.iter().cloned())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            program: program.to_string(),
            args,
            display,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn display(&self) -> &str {
        &self.display
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display)
    }
}

/// Builder for a single PowerShell pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PowerShell {
    script: String,
    display: String,
}

impl PowerShell {
    /// Starts a pipeline with the given cmdlet.
    pub fn cmdlet(name: &str) -> Self {
        Self {
            script: name.to_string(),
            display: name.to_string(),
        }
    }

    /// Appends `-Parameter 'value'` with the value quoted as a literal.
    pub fn literal(self, parameter: &str, value: &str) -> Self {
        let quoted = quote(value);
        self.push(&format!("-{} {}", parameter, quoted), None)
    }

    /// Appends `-Parameter token` unquoted.
    ///
    /// Only for values the formatter controls: validated enum members,
    /// integers and PowerShell constants such as `$true`.
    pub fn token(self, parameter: &str, token: impl fmt::Display) -> Self {
        self.push(&format!("-{} {}", parameter, token), None)
    }

    /// Appends `-Parameter (ConvertTo-SecureString 'value' -AsPlainText -Force)`.
    pub fn secure_string(self, parameter: &str, value: &str) -> Self {
        let template = |inner: &str| {
            format!(
                "-{} (ConvertTo-SecureString {} -AsPlainText -Force)",
                parameter, inner
            )
        };
        let script = template(&quote(value));
        let display = template(REDACTED);
        self.push(&script, Some(&display))
    }

    /// Appends `-Parameter @{'key'='value'}`.
    pub fn hashtable(self, parameter: &str, key: &str, value: &str) -> Self {
        let entry = format!("-{} @{{{}={}}}", parameter, quote(key), quote(value));
        self.push(&entry, None)
    }

    /// Appends a switch such as `-Reset` or `-Confirm:$false`.
    pub fn switch(self, switch: &str) -> Self {
        self.push(&format!("-{}", switch), None)
    }

    /// Pipes the output into another cmdlet.
    pub fn pipe(self, cmdlet: &str) -> Self {
        self.push(&format!("| {}", cmdlet), None)
    }

    pub fn script(&self) -> &str {
        &self.script
    }

    /// Wraps the pipeline into a non-interactive `powershell.exe` invocation.
    pub fn into_command(self) -> CommandLine {
        let args = vec![
            "-NoProfile".to_string(),
            "-NonInteractive".to_string(),
            "-Command".to_string(),
            self.script,
        ];
        let display = format!(
            "{} -NoProfile -NonInteractive -Command {}",
            POWERSHELL, self.display
        );
        CommandLine {
            program: POWERSHELL.to_string(),
            args,
            display,
        }
    }

    fn push(mut self, fragment: &str, display: Option<&str>) -> Self {
        self.script.push(' ');
        self.script.push_str(fragment);
        self.display.push(' ');
        self.display.push_str(display.unwrap_or(fragment));
        self
    }
}

/// Quotes a value as a PowerShell single-quoted string literal.
///
/// PowerShell treats the typographic single quotes like `'`, so every
/// one of them is escaped by doubling.
pub fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if matches!(c, '\'' | '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}') {
            quoted.push(c);
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}
