use crate::inventory::domain::{CredentialReference, HmcEndpoint};
use crate::shared::error::ConfigError;
use std::collections::{BTreeMap, HashSet};

/// Upper bound on hosts produced by a single template
pub const MAX_EXPANDED_HOSTS: usize = 1024;

/// Variable bindings available to host templates.
///
/// A scalar is a one-element list; a list variable expands to one host per element.
pub type Variables = BTreeMap<String, Vec<String>>;

/// One configured host entry before expansion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSpec {
    pub template: String,
    pub user: Option<String>,
    pub credential: Option<CredentialReference>,
}

impl HostSpec {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            user: None,
            credential: None,
        }
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    pub fn with_credential(mut self, credential: CredentialReference) -> Self {
        self.credential = Some(credential);
        self
    }
}

/// Fallbacks applied to host entries that omit user or password
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostDefaults {
    pub user: Option<String>,
    pub credential: Option<CredentialReference>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(String),
    Range {
        start: u64,
        end: u64,
        width: usize,
    },
}

fn invalid(template: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::InvalidTemplate {
        template: template.to_string(),
        reason: reason.into(),
    }
}

fn parse_template(template: &str) -> Result<Vec<Segment>, ConfigError> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '$' if chars.peek() == Some(&'$') => {
                chars.next();
                literal.push('$');
            }
            '$' if chars.peek() == Some(&'{') => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '}' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(invalid(template, "unterminated '${' placeholder"));
                }
                let name = name.trim().to_string();
                if name.is_empty()
                    || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
                {
                    return Err(invalid(
                        template,
                        format!("invalid variable name '{}'", name),
                    ));
                }
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(Segment::Variable(name));
            }
            '[' => {
                let mut body = String::new();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == ']' {
                        closed = true;
                        break;
                    }
                    body.push(c);
                }
                if !closed {
                    return Err(invalid(template, "unterminated '[' range"));
                }
                match parse_range(&body) {
                    RangeParse::Range(range) => {
                        if !literal.is_empty() {
                            segments.push(Segment::Literal(std::mem::take(&mut literal)));
                        }
                        segments.push(range);
                    }
                    // Bracketed IPv6 literal such as [fd00::10]
                    RangeParse::NotARange => {
                        literal.push('[');
                        literal.push_str(&body);
                        literal.push(']');
                    }
                    RangeParse::Malformed(reason) => return Err(invalid(template, reason)),
                }
            }
            _ => literal.push(c),
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

enum RangeParse {
    Range(Segment),
    NotARange,
    Malformed(String),
}

fn parse_range(body: &str) -> RangeParse {
    if body.matches(':').count() != 1 {
        return RangeParse::NotARange;
    }
    let Some((start_text, end_text)) = body.split_once(':') else {
        return RangeParse::NotARange;
    };
    let is_number = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !is_number(start_text) || !is_number(end_text) {
        return RangeParse::Malformed(format!("malformed range '[{}]'", body));
    }
    let (Ok(start), Ok(end)) = (start_text.parse::<u64>(), end_text.parse::<u64>()) else {
        return RangeParse::Malformed(format!("range bounds too large in '[{}]'", body));
    };
    if start > end {
        return RangeParse::Malformed(format!(
            "range start {} is greater than end {}",
            start, end
        ));
    }
    let width = if start_text.len() > 1 && start_text.starts_with('0') {
        start_text.len()
    } else {
        0
    };
    RangeParse::Range(Segment::Range { start, end, width })
}

fn validate_host(template: &str, host: &str) -> Result<(), ConfigError> {
    if host.is_empty() {
        return Err(invalid(template, "expands to an empty host name"));
    }
    if let Some(bad) = host
        .chars()
        .find(|c| c.is_whitespace() || matches!(c, '/' | '\\' | '@' | '?' | '#'))
    {
        return Err(invalid(
            template,
            format!("host '{}' contains invalid character '{}'", host, bad),
        ));
    }
    Ok(())
}

/// Expands one host template against the variable bindings.
///
/// Placeholders expand as a cartesian product, left to right. The result keeps
/// expansion order and may still contain duplicates; `resolve_hosts` removes them.
///
/// # Errors
/// - `ConfigError::UndefinedVariable` when a `${name}` has no binding
/// - `ConfigError::InvalidTemplate` for syntax errors, empty results or oversized expansions
pub fn expand_template(template: &str, variables: &Variables) -> Result<Vec<String>, ConfigError> {
    let segments = parse_template(template.trim())?;
    let mut hosts = vec![String::new()];

    for segment in &segments {
        let choices: Vec<String> = match segment {
            Segment::Literal(text) => vec![text.clone()],
            Segment::Variable(name) => {
                let values = variables.get(name).ok_or_else(|| ConfigError::UndefinedVariable {
                    template: template.to_string(),
                    variable: name.clone(),
                })?;
                if values.is_empty() {
                    return Err(invalid(
                        template,
                        format!("variable '{}' is an empty list", name),
                    ));
                }
                values.clone()
            }
            Segment::Range { start, end, width } => {
                if end
                    .checked_sub(*start)
                    .filter(|span| *span < MAX_EXPANDED_HOSTS as u64)
                    .is_none()
                {
                    return Err(invalid(
                        template,
                        format!("expands to more than {} hosts", MAX_EXPANDED_HOSTS),
                    ));
                }
                (*start..=*end)
                    .map(|n| format!("{:0width$}", n, width = *width))
                    .collect()
            }
        };

        if hosts.len() * choices.len() > MAX_EXPANDED_HOSTS {
            return Err(invalid(
                template,
                format!("expands to more than {} hosts", MAX_EXPANDED_HOSTS),
            ));
        }

        hosts = hosts
            .iter()
            .flat_map(|prefix| choices.iter().map(move |choice| format!("{}{}", prefix, choice)))
            .collect();
    }

    for host in &hosts {
        validate_host(template, host)?;
    }
    Ok(hosts)
}

/// Expands every host entry into concrete endpoints.
///
/// Runs entirely before any network activity. The result contains no duplicate
/// endpoints: hosts are compared case-insensitively and the first occurrence
/// keeps its position and its credentials.
///
/// `lookup` resolves environment-variable credential references.
///
/// # Errors
/// Any template, user or credential problem is returned as a `ConfigError`.
pub fn resolve_hosts<F>(
    specs: &[HostSpec],
    defaults: &HostDefaults,
    variables: &Variables,
    lookup: F,
) -> Result<Vec<HmcEndpoint>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut seen = HashSet::new();
    let mut endpoints = Vec::new();

    for spec in specs {
        for host in expand_template(&spec.template, variables)? {
            if !seen.insert(host.to_ascii_lowercase()) {
                tracing::debug!(host = %host, template = %spec.template, "skipping duplicate HMC host");
                continue;
            }

            let user = spec
                .user
                .as_ref()
                .or(defaults.user.as_ref())
                .filter(|u| !u.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingCredential {
                    host: host.clone(),
                    reason: "no user configured".to_string(),
                })?;

            let credential = spec
                .credential
                .as_ref()
                .or(defaults.credential.as_ref())
                .ok_or_else(|| ConfigError::MissingCredential {
                    host: host.clone(),
                    reason: "no password configured".to_string(),
                })?;

            let secret = credential
                .resolve(&lookup)
                .map_err(|reason| ConfigError::MissingCredential {
                    host: host.clone(),
                    reason,
                })?;

            endpoints.push(HmcEndpoint::new(host, user.clone(), secret));
        }
    }

    if endpoints.is_empty() {
        return Err(ConfigError::NoHosts);
    }
    Ok(endpoints)
}
