//! layered settings. defaults first, then every config file in the order
//! given. files are yaml or json depending on their extension and every key
//! is optional.

use std::path::{Component, Path, PathBuf};
use std::fmt::{Display, Formatter};
use std::time::Duration;

use abha_api::client::{ApiClient, DEFAULT_GATEWAY_URL, DEFAULT_ENROLLMENT_URL, DEFAULT_CM_ID};
use abha_api::enrollment::SCOPE_ENROL;
use abha_lib::account::{suggest_addresses, NameFragments};

use crate::error::{self, Context};
use crate::flow::{FlowOptions, DEFAULT_LOGIN_ID};
use crate::flow::timer::Delay;

mod shape;

pub const DEFAULT_SESSION_FILE: &str = "abha_session.json";

pub trait TryDefault: Sized {
    type Error;

    fn try_default() -> Result<Self, Self::Error>;
}

#[derive(Debug)]
pub struct Settings {
    pub user_agent: Option<String>,
    pub gateway: Gateway,
    pub enrollment: Enrollment,
    pub session: SessionFile,
    pub flow: Timing,
    pub suggestions: Suggestions,
}

impl Settings {
    /// defaults merged with each file in order
    pub fn load<I>(files: I) -> error::Result<Self>
    where
        I: IntoIterator<Item = PathBuf>
    {
        let cwd = std::env::current_dir()
            .context("failed to retrieve cwd for Settings")?;
        let mut settings = Settings::try_default()?;

        for config_path in files {
            let full = if config_path.is_absolute() {
                config_path
            } else {
                normalize(cwd.join(config_path))
            };

            tracing::debug!("loading config file \"{}\"", full.display());

            let loaded = load_file(&full)?;
            let src = SrcFile::new(&full)?;
            let dot = DotPath::new(&"settings");

            settings.merge(&src, dot, loaded)?;
        }

        tracing::debug!("{settings:#?}");

        Ok(settings)
    }

    fn merge(&mut self, src: &SrcFile<'_>, dot: DotPath<'_>, settings: shape::Settings) -> error::Result<()> {
        if let Some(user_agent) = settings.user_agent {
            self.user_agent = Some(user_agent);
        }

        if let Some(gateway) = settings.gateway {
            self.gateway.merge(src, dot.push(&"gateway"), gateway)?;
        }

        if let Some(enrollment) = settings.enrollment {
            self.enrollment.merge(src, dot.push(&"enrollment"), enrollment)?;
        }

        if let Some(session) = settings.session {
            self.session.merge(src, dot.push(&"session"), session)?;
        }

        if let Some(flow) = settings.flow {
            self.flow.merge(src, dot.push(&"flow"), flow)?;
        }

        if let Some(suggestions) = settings.suggestions {
            self.suggestions.merge(src, dot.push(&"suggestions"), suggestions)?;
        }

        Ok(())
    }

    pub fn api_client(&self) -> error::Result<ApiClient> {
        let mut builder = ApiClient::builder();

        builder.gateway_url(&self.gateway.url)
            .context("invalid settings.gateway.url")?;
        builder.enrollment_url(&self.enrollment.url)
            .context("invalid settings.enrollment.url")?;
        builder.cm_id(self.gateway.cm_id.clone());
        builder.timeout(Duration::from_secs(self.gateway.timeout_secs));

        if let Some(user_agent) = &self.user_agent {
            builder.user_agent(user_agent.clone());
        }

        builder.build().context("failed to create api client")
    }

    pub fn flow_options(&self) -> FlowOptions {
        FlowOptions {
            scope: self.enrollment.scope.clone(),
            login_id: self.enrollment.login_id.clone(),
            verify_delay: Delay::from_millis(self.flow.verify_delay_ms),
            create_delay: Delay::from_millis(self.flow.create_delay_ms),
            resend_cooldown: Duration::from_secs(self.flow.resend_cooldown_secs),
            fragments: self.suggestions.fragments(),
        }
    }
}

impl TryDefault for Settings {
    type Error = error::Error;

    fn try_default() -> Result<Self, Self::Error> {
        Ok(Settings {
            user_agent: None,
            gateway: Gateway::default(),
            enrollment: Enrollment::default(),
            session: SessionFile::try_default()?,
            flow: Timing::default(),
            suggestions: Suggestions::default(),
        })
    }
}

#[derive(Debug)]
pub struct Gateway {
    pub url: String,
    pub cm_id: String,
    pub timeout_secs: u64,
}

impl Gateway {
    fn merge(&mut self, src: &SrcFile<'_>, dot: DotPath<'_>, gateway: shape::Gateway) -> error::Result<()> {
        if let Some(url) = gateway.url {
            self.url = check_url(url, src, dot.push(&"url"))?;
        }

        if let Some(cm_id) = gateway.cm_id {
            self.cm_id = check_present(cm_id, src, dot.push(&"cm_id"))?;
        }

        if let Some(timeout_secs) = gateway.timeout_secs {
            if timeout_secs == 0 {
                return Err(error::Error::new().context(format!(
                    "{} must be greater than 0. file: {src}", dot.push(&"timeout_secs")
                )));
            }

            self.timeout_secs = timeout_secs;
        }

        Ok(())
    }
}

impl Default for Gateway {
    fn default() -> Self {
        Gateway {
            url: DEFAULT_GATEWAY_URL.into(),
            cm_id: DEFAULT_CM_ID.into(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug)]
pub struct Enrollment {
    pub url: String,
    pub scope: String,
    pub login_id: String,
}

impl Enrollment {
    fn merge(&mut self, src: &SrcFile<'_>, dot: DotPath<'_>, enrollment: shape::Enrollment) -> error::Result<()> {
        if let Some(url) = enrollment.url {
            self.url = check_url(url, src, dot.push(&"url"))?;
        }

        if let Some(scope) = enrollment.scope {
            self.scope = check_present(scope, src, dot.push(&"scope"))?;
        }

        if let Some(login_id) = enrollment.login_id {
            self.login_id = check_present(login_id, src, dot.push(&"login_id"))?;
        }

        Ok(())
    }
}

impl Default for Enrollment {
    fn default() -> Self {
        Enrollment {
            url: DEFAULT_ENROLLMENT_URL.into(),
            scope: SCOPE_ENROL.into(),
            login_id: DEFAULT_LOGIN_ID.into(),
        }
    }
}

#[derive(Debug)]
pub struct SessionFile {
    pub file: PathBuf,
}

impl SessionFile {
    fn merge(&mut self, src: &SrcFile<'_>, dot: DotPath<'_>, session: shape::SessionFile) -> error::Result<()> {
        if let Some(file) = session.file {
            if file.as_os_str().is_empty() {
                return Err(error::Error::new().context(format!(
                    "{} is empty. file: {src}", dot.push(&"file")
                )));
            }

            self.file = if file.is_absolute() {
                file
            } else {
                normalize(src.parent.join(file))
            };
        }

        Ok(())
    }
}

impl TryDefault for SessionFile {
    type Error = error::Error;

    fn try_default() -> Result<Self, Self::Error> {
        let cwd = std::env::current_dir()
            .context("failed to retrieve cwd for SessionFile")?;

        Ok(SessionFile {
            file: cwd.join(DEFAULT_SESSION_FILE)
        })
    }
}

#[derive(Debug)]
pub struct Timing {
    pub verify_delay_ms: u64,
    pub create_delay_ms: u64,
    pub resend_cooldown_secs: u64,
}

impl Timing {
    fn merge(&mut self, _src: &SrcFile<'_>, _dot: DotPath<'_>, timing: shape::Timing) -> error::Result<()> {
        if let Some(verify_delay_ms) = timing.verify_delay_ms {
            self.verify_delay_ms = verify_delay_ms;
        }

        if let Some(create_delay_ms) = timing.create_delay_ms {
            self.create_delay_ms = create_delay_ms;
        }

        if let Some(resend_cooldown_secs) = timing.resend_cooldown_secs {
            self.resend_cooldown_secs = resend_cooldown_secs;
        }

        Ok(())
    }
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            verify_delay_ms: 2000,
            create_delay_ms: 2000,
            resend_cooldown_secs: 30,
        }
    }
}

#[derive(Debug)]
pub struct Suggestions {
    pub first: String,
    pub last: String,
    pub year: String,
    pub city: String,
}

impl Suggestions {
    fn merge(&mut self, src: &SrcFile<'_>, dot: DotPath<'_>, suggestions: shape::Suggestions) -> error::Result<()> {
        if let Some(first) = suggestions.first {
            self.first = check_present(first, src, dot.push(&"first"))?;
        }

        if let Some(last) = suggestions.last {
            self.last = check_present(last, src, dot.push(&"last"))?;
        }

        if let Some(year) = suggestions.year {
            self.year = check_present(year, src, dot.push(&"year"))?;
        }

        if let Some(city) = suggestions.city {
            self.city = check_present(city, src, dot.push(&"city"))?;
        }

        if suggest_addresses(&self.fragments()).is_empty() {
            return Err(error::Error::new().context(format!(
                "{dot} does not produce any valid account address. file: {src}"
            )));
        }

        Ok(())
    }

    pub fn fragments(&self) -> NameFragments {
        NameFragments {
            first: self.first.clone(),
            last: self.last.clone(),
            year: self.year.clone(),
            city: self.city.clone(),
        }
    }
}

impl Default for Suggestions {
    fn default() -> Self {
        let NameFragments { first, last, year, city } = NameFragments::default();

        Suggestions { first, last, year, city }
    }
}

fn load_file(path: &Path) -> error::Result<shape::Settings> {
    let ext = path.extension().context(format!(
        "failed to retrieve the file extension for config file: \"{}\"", path.display()
    ))?;

    let ext = ext.to_ascii_lowercase();
    let file = std::fs::OpenOptions::new()
        .read(true)
        .open(path)
        .context(format!("failed to open config file: \"{}\"", path.display()))?;
    let reader = std::io::BufReader::new(file);

    if ext.eq("yaml") || ext.eq("yml") {
        serde_yaml::from_reader(reader).context(format!(
            "failed to parse yaml config file: \"{}\"", path.display()
        ))
    } else if ext.eq("json") {
        serde_json::from_reader(reader).context(format!(
            "failed to parse json config file: \"{}\"", path.display()
        ))
    } else {
        Err(error::Error::new().context(format!(
            "unknown type of config file: \"{}\"", path.display()
        )))
    }
}

/// resolves `.` and `..` without touching the file system
pub fn normalize<P>(path: P) -> PathBuf
where
    P: AsRef<Path>
{
    let mut rtn = PathBuf::new();

    for comp in path.as_ref().components() {
        match comp {
            Component::ParentDir => {
                rtn.pop();
            },
            Component::CurDir => {},
            other => rtn.push(other.as_os_str()),
        }
    }

    rtn
}

struct SrcFile<'a> {
    parent: &'a Path,
    src: &'a Path,
}

impl<'a> SrcFile<'a> {
    fn new(src: &'a Path) -> error::Result<Self> {
        let parent = src.parent().context(format!(
            "failed to retrieve parent path from source file \"{}\"", src.display()
        ))?;

        Ok(SrcFile {
            parent,
            src
        })
    }
}

impl<'a> Display for SrcFile<'a> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.src.display())
    }
}

struct DotPath<'a>(Vec<&'a dyn Display>);

impl<'a> DotPath<'a> {
    fn new(name: &'a (dyn Display)) -> Self {
        DotPath(vec![name])
    }

    fn push(&self, name: &'a (dyn Display)) -> Self {
        let mut path = self.0.clone();
        path.push(name);

        DotPath(path)
    }
}

impl<'a> Display for DotPath<'a> {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;

        for name in &self.0 {
            if first {
                write!(fmt, "{name}")?;
                first = false;
            } else {
                write!(fmt, ".{name}")?;
            }
        }

        Ok(())
    }
}

fn check_present(given: String, src: &SrcFile<'_>, dot: DotPath<'_>) -> error::Result<String> {
    let trimmed = given.trim();

    if trimmed.is_empty() {
        return Err(error::Error::new().context(format!(
            "{dot} is empty. file: {src}"
        )));
    }

    Ok(trimmed.to_owned())
}

fn check_url(given: String, src: &SrcFile<'_>, dot: DotPath<'_>) -> error::Result<String> {
    let trimmed = given.trim();

    let url = url::Url::parse(trimmed).context(format!(
        "{dot} \"{given}\" is not a valid url. file: {src}"
    ))?;

    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(error::Error::new().context(format!(
            "{dot} \"{given}\" must be an http or https url. file: {src}"
        )));
    }

    Ok(trimmed.to_owned())
}

#[cfg(test)]
mod test {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn defaults() {
        let settings = Settings::load(Vec::new()).unwrap();

        assert_eq!(settings.gateway.url, DEFAULT_GATEWAY_URL);
        assert_eq!(settings.gateway.cm_id, "sbx");
        assert_eq!(settings.enrollment.scope, "abha-enrol");
        assert!(settings.session.file.ends_with(DEFAULT_SESSION_FILE));

        let options = settings.flow_options();

        assert_eq!(options.verify_delay, Delay::from_millis(2000));
        assert_eq!(options.resend_cooldown, Duration::from_secs(30));
        assert_eq!(options.fragments, NameFragments::default());
    }

    #[test]
    fn files_merge_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let yaml = write(dir.path(), "base.yaml", "\
gateway:
  url: http://localhost:9000/gateway/v3
  cm_id: local
session:
  file: ./state/session.json
flow:
  verify_delay_ms: 0
suggestions:
  first: priya
");
        let json = write(dir.path(), "override.json", r#"{
            "gateway": {"cm_id": "override"},
            "flow": {"create_delay_ms": 10, "resend_cooldown_secs": 5}
        }"#);

        let settings = Settings::load(vec![yaml, json]).unwrap();

        assert_eq!(settings.gateway.url, "http://localhost:9000/gateway/v3");
        assert_eq!(settings.gateway.cm_id, "override");
        assert_eq!(settings.session.file, normalize(dir.path().join("state/session.json")));
        assert_eq!(settings.flow.verify_delay_ms, 0);
        assert_eq!(settings.flow.create_delay_ms, 10);
        assert_eq!(settings.flow.resend_cooldown_secs, 5);
        assert_eq!(settings.suggestions.first, "priya");
        assert_eq!(settings.suggestions.last, "sharma");

        let client = settings.api_client().unwrap();

        assert_eq!(client.info().cm_id, "override");
        assert_eq!(client.info().gateway.as_str(), "http://localhost:9000/gateway/v3/");
    }

    #[test]
    fn invalid_values_name_the_key() {
        let dir = tempfile::tempdir().unwrap();
        let bad_url = write(dir.path(), "bad.yaml", "enrollment:\n  url: ftp://example.com\n");
        let empty = write(dir.path(), "empty.json", r#"{"gateway": {"cm_id": "  "}}"#);

        let err = Settings::load(vec![bad_url]).unwrap_err().to_string();
        assert!(err.contains("settings.enrollment.url"), "{err}");

        let err = Settings::load(vec![empty]).unwrap_err().to_string();
        assert!(err.contains("settings.gateway.cm_id"), "{err}");
    }

    #[test]
    fn suggestions_must_produce_addresses() {
        let dir = tempfile::tempdir().unwrap();
        let blank = write(dir.path(), "blank.yaml", "suggestions:\n  first: \"\"\n  last: \"\"\n");
        let symbols = write(
            dir.path(),
            "symbols.json",
            r#"{"suggestions": {"first": "!!", "last": "--", "year": "..", "city": "??"}}"#
        );
        let partial = write(dir.path(), "partial.yaml", "suggestions:\n  first: Priya\n  last: Nair\n");

        let err = Settings::load(vec![blank]).unwrap_err().to_string();
        assert!(err.contains("settings.suggestions.first"), "{err}");

        let err = Settings::load(vec![symbols]).unwrap_err().to_string();
        assert!(err.contains("settings.suggestions"), "{err}");
        assert!(err.contains("valid account address"), "{err}");

        let settings = Settings::load(vec![partial]).unwrap();
        let fragments = settings.flow_options().fragments;

        assert_eq!(fragments.first, "Priya");
        assert_eq!(suggest_addresses(&fragments)[0].as_str(), "priya.nair@abha");
    }

    #[test]
    fn unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let toml = write(dir.path(), "config.toml", "[gateway]\n");

        let err = Settings::load(vec![toml]).unwrap_err().to_string();
        assert!(err.contains("unknown type of config file"), "{err}");
    }

    #[test]
    fn normalize_paths() {
        assert_eq!(normalize("/a/b/../c/./d"), PathBuf::from("/a/c/d"));
    }
}
