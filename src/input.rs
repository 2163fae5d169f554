use std::io::Write;

pub fn read_stdin_buf<P>(prompt: P, buffer: &mut String) -> std::io::Result<usize>
where
    P: AsRef<str>
{
    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    stdout.write_all(prompt.as_ref().as_bytes())?;
    stdout.flush()?;

    stdin.read_line(buffer)
}

/// reads a single line. `None` when stdin has been closed
pub fn read_line<P>(prompt: P) -> std::io::Result<Option<String>>
where
    P: AsRef<str>
{
    let mut buffer = String::new();

    if read_stdin_buf(prompt, &mut buffer)? == 0 {
        Ok(None)
    } else {
        Ok(Some(buffer))
    }
}

pub fn read_stdin_trimmed<P>(prompt: P) -> std::io::Result<String>
where
    P: AsRef<str>
{
    let given = read_line(prompt)?.unwrap_or_default();

    Ok(given.trim().to_owned())
}

/// uses the environment variable if it is set and not empty, otherwise
/// prompts for the value
pub fn env_or_prompt<P>(var: &str, prompt: P) -> std::io::Result<String>
where
    P: AsRef<str>
{
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => read_stdin_trimmed(prompt),
    }
}

/// same as [`env_or_prompt`] without echoing what is typed
pub fn env_or_secret<P>(var: &str, prompt: P) -> std::io::Result<String>
where
    P: AsRef<str>
{
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => rpassword::prompt_password(prompt.as_ref()),
    }
}

pub fn read_yn<P>(prefix: P) -> std::io::Result<bool>
where
    P: std::fmt::Display
{
    let prompt = format!("{} [y|n]: ", prefix);
    let result = read_stdin_trimmed(prompt)?;

    if let Some(first) = result.chars().next() {
        Ok(first.to_ascii_lowercase() == 'y')
    } else {
        Ok(false)
    }
}
