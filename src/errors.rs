use std::fmt;
use std::fmt::Formatter;
use thiserror::Error;

/// Error depicting errors that occur while loading the configuration or validating band tables
///
#[derive(Error, Debug)]
#[error("ConfigError in {component}: {reason} (input: {input})")]
pub struct ConfigError {
    pub component: &'static str,
    pub reason: String,
    pub input: String,
}
impl ConfigError {
    pub fn new(component: &'static str, reason: String, input: &str) -> ConfigError {
        ConfigError { component, reason, input: input.to_string() }
    }
}

/// Error depicting a malformed sample sequence given to the bucketing or aggregation steps
///
#[derive(Error, Debug)]
#[error("InputError in {component}: {reason} (input: {input})")]
pub struct InputError {
    pub component: &'static str,
    pub reason: String,
    pub input: String,
}
impl InputError {
    pub fn new(component: &'static str, reason: &str, input: String) -> InputError {
        InputError { component, reason: reason.to_string(), input }
    }
}

/// Error depicting a layout contract violation, i.e. too many days or an unusable canvas
///
#[derive(Error, Debug)]
#[error("LayoutError in {component}: {reason} (input: {input})")]
pub struct LayoutError {
    pub component: &'static str,
    pub reason: String,
    pub input: String,
}
impl LayoutError {
    pub fn new(component: &'static str, reason: &str, input: String) -> LayoutError {
        LayoutError { component, reason: reason.to_string(), input }
    }
}

/// The kind of failure reported by an external collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExternalKind {
    Network,
    NotFound,
    Document,
    Io,
}

impl fmt::Display for ExternalKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            ExternalKind::Network  => write!(f, "Network"),
            ExternalKind::NotFound => write!(f, "NotFound"),
            ExternalKind::Document => write!(f, "Document"),
            ExternalKind::Io       => write!(f, "Io"),
        }
    }
}

/// Error depicting failures in network retrieval of forecasts, geocoding, UV or icons
///
#[derive(Error, Debug)]
#[error("ExternalError::{kind} in {component}: {reason} (input: {input})")]
pub struct ExternalError {
    pub component: &'static str,
    pub kind: ExternalKind,
    pub reason: String,
    pub input: String,
}
impl ExternalError {
    pub fn new(component: &'static str, kind: ExternalKind, reason: String, input: &str) -> ExternalError {
        ExternalError { component, kind, reason, input: input.to_string() }
    }

    /// Maps a ureq error to an external error, a 404 is reported as NotFound
    ///
    /// # Arguments
    ///
    /// * 'component' - the component that made the request
    /// * 'e' - the ureq error
    /// * 'input' - the input that triggered the request
    pub fn from_ureq(component: &'static str, e: ureq::Error, input: &str) -> ExternalError {
        let kind = match e {
            ureq::Error::StatusCode(404) => ExternalKind::NotFound,
            _ => ExternalKind::Network,
        };
        ExternalError::new(component, kind, e.to_string(), input)
    }
}

/// Error depicting failures when embedding images into or writing the output document
///
#[derive(Error, Debug)]
#[error("CanvasError in {component}: {reason} (output: {output})")]
pub struct CanvasError {
    pub component: &'static str,
    pub reason: String,
    pub output: String,
}

/// Umbrella error for a report generation run
///
#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error(transparent)]
    External(#[from] ExternalError),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}
