use crate::inventory::domain::{HmcEndpoint, ManagedSystem, Mtms, PartitionRecord};
use crate::ports::outbound::{HmcConnector, HmcSession};
use crate::shared::error::FetchError;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

const LOGON_PATH: &str = "/rest/api/web/Logon";
const LOGON_CONTENT_TYPE: &str = "application/vnd.ibm.powervm.web+xml; type=LogonRequest";
const LOGON_ACCEPT: &str = "application/vnd.ibm.powervm.web+xml; type=LogonResponse";
const LOGON_NAMESPACE: &str = "http://www.ibm.com/xmlns/systems/power/firmware/web/mc/2012_10/";
const SESSION_HEADER: &str = "X-API-Session";

/// Settings for the HMC REST transport
#[derive(Debug, Clone)]
pub struct RestSettings {
    pub port: u16,
    pub validate_certs: bool,
    pub request_timeout: Duration,
    pub max_retries: u32,
}

impl Default for RestSettings {
    fn default() -> Self {
        Self {
            port: 12443,
            validate_certs: true,
            request_timeout: Duration::from_secs(30),
            max_retries: 3,
        }
    }
}

/// HmcRestConnector adapter talking to the HMC REST API
///
/// Uses the JSON "quick" collections, which carry everything the inventory needs
/// without walking the full Atom/XML object model:
/// - `PUT /rest/api/web/Logon` to obtain an `X-API-Session` token
/// - `GET /rest/api/uom/ManagedSystem/quick/All`
/// - `GET /rest/api/uom/ManagedSystem/{uuid}/LogicalPartition/quick/All`
/// - `GET /rest/api/uom/ManagedSystem/{uuid}/VirtualIOServer/quick/All`
/// - `DELETE /rest/api/web/Logon` to log off
pub struct HmcRestConnector {
    client: reqwest::Client,
    settings: RestSettings,
}

impl HmcRestConnector {
    pub fn new(settings: RestSettings) -> crate::shared::Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("hmc-inventory/{}", version);
        let client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(user_agent)
            .danger_accept_invalid_certs(!settings.validate_certs)
            .build()?;

        Ok(Self { client, settings })
    }

    fn base_url(&self, host: &str) -> String {
        format!("https://{}:{}", host, self.settings.port)
    }
}

#[async_trait]
impl HmcConnector for HmcRestConnector {
    async fn connect(&self, endpoint: &HmcEndpoint) -> Result<Box<dyn HmcSession>, FetchError> {
        let host = endpoint.host().to_string();
        let base_url = self.base_url(&host);
        let body = logon_request_body(endpoint.username(), endpoint.password().expose());

        tracing::debug!(hmc = %host, user = %endpoint.username(), "logging on to HMC");

        let response = self
            .client
            .put(format!("{}{}", base_url, LOGON_PATH))
            .header(reqwest::header::CONTENT_TYPE, LOGON_CONTENT_TYPE)
            .header(reqwest::header::ACCEPT, LOGON_ACCEPT)
            .body(body)
            .send()
            .await
            .map_err(|e| FetchError::connection(&host, e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::connection(
                &host,
                format!("authentication failed for user {}", endpoint.username()),
            ));
        }
        if !status.is_success() {
            return Err(FetchError::connection(
                &host,
                format!("logon returned status code {}", status),
            ));
        }

        let text = response
            .text()
            .await
            .map_err(|e| FetchError::connection(&host, e))?;
        let token = extract_session_token(&text)
            .ok_or_else(|| FetchError::protocol(&host, "logon response carries no X-API-Session"))?;

        Ok(Box::new(HmcRestSession {
            client: self.client.clone(),
            base_url,
            host,
            token,
            max_retries: self.settings.max_retries.max(1),
        }))
    }
}

/// An authenticated REST session with one HMC
struct HmcRestSession {
    client: reqwest::Client,
    base_url: String,
    host: String,
    token: String,
    max_retries: u32,
}

impl HmcRestSession {
    /// GETs a quick collection and returns its JSON body.
    ///
    /// `204 No Content` means an empty collection and yields `None`.
    /// Transport failures and 5xx responses are retried; everything else fails fast.
    async fn get_quick(&self, path: &str) -> Result<Option<String>, FetchError> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_error = None;

        for attempt in 1..=self.max_retries {
            match self.get_once(&url).await {
                Ok(body) => return Ok(body),
                Err((error, retryable)) => {
                    if !retryable {
                        return Err(error);
                    }
                    tracing::debug!(hmc = %self.host, %url, attempt, error = %error, "retrying HMC request");
                    last_error = Some(error);
                    if attempt < self.max_retries {
                        tokio::time::sleep(Duration::from_millis(100 * attempt as u64)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| FetchError::connection(&self.host, "no attempt made")))
    }

    async fn get_once(&self, url: &str) -> Result<Option<String>, (FetchError, bool)> {
        let response = self
            .client
            .get(url)
            .header(SESSION_HEADER, &self.token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| (FetchError::connection(&self.host, e), true))?;

        let status = response.status();
        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err((
                FetchError::connection(&self.host, "session rejected by HMC"),
                false,
            ));
        }
        if status.is_server_error() {
            return Err((
                FetchError::connection(&self.host, format!("{} returned {}", url, status)),
                true,
            ));
        }
        if !status.is_success() {
            return Err((
                FetchError::protocol(&self.host, format!("{} returned {}", url, status)),
                false,
            ));
        }

        response
            .text()
            .await
            .map(Some)
            .map_err(|e| (FetchError::connection(&self.host, e), true))
    }

    /// GETs a collection path, treating an empty or missing body as an empty collection
    async fn get_collection(&self, path: &str) -> Result<String, FetchError> {
        match self.get_quick(path).await? {
            Some(body) if !body.trim().is_empty() => Ok(body),
            _ => Ok("[]".to_string()),
        }
    }
}

#[async_trait]
impl HmcSession for HmcRestSession {
    async fn list_managed_systems(&mut self) -> Result<Vec<ManagedSystem>, FetchError> {
        let body = self
            .get_collection("/rest/api/uom/ManagedSystem/quick/All")
            .await?;
        parse_managed_systems(&self.host, &body)
    }

    async fn list_partitions(
        &mut self,
        system: &ManagedSystem,
        include_vios: bool,
    ) -> Result<Vec<PartitionRecord>, FetchError> {
        let uuid = validate_uuid(&self.host, system.uuid())?;

        let body = self
            .get_collection(&format!(
                "/rest/api/uom/ManagedSystem/{}/LogicalPartition/quick/All",
                uuid
            ))
            .await?;
        let mut records = parse_partitions(&self.host, &body, false)?;

        if include_vios {
            let body = self
                .get_collection(&format!(
                    "/rest/api/uom/ManagedSystem/{}/VirtualIOServer/quick/All",
                    uuid
                ))
                .await?;
            records.extend(parse_partitions(&self.host, &body, true)?);
        }

        Ok(records)
    }

    async fn close(self: Box<Self>) -> Result<(), FetchError> {
        let response = self
            .client
            .delete(format!("{}{}", self.base_url, LOGON_PATH))
            .header(SESSION_HEADER, &self.token)
            .send()
            .await
            .map_err(|e| FetchError::connection(&self.host, e))?;

        if !response.status().is_success() {
            return Err(FetchError::protocol(
                &self.host,
                format!("logoff returned status code {}", response.status()),
            ));
        }
        Ok(())
    }
}

/// Rejects identifiers that would change the request path
fn validate_uuid(host: &str, uuid: &str) -> Result<String, FetchError> {
    if uuid.is_empty() || uuid.contains('/') || uuid.contains('\\') || uuid.contains("..") {
        return Err(FetchError::protocol(
            host,
            format!("managed system UUID '{}' is not usable in a URL", uuid),
        ));
    }
    Ok(urlencoding::encode(uuid).into_owned())
}

fn xml_escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn logon_request_body(user: &str, password: &str) -> String {
    format!(
        r#"<LogonRequest xmlns="{}" schemaVersion="V1_0"><Metadata><Atom/></Metadata><UserID kb="CUR" kxe="false">{}</UserID><Password kb="CUR" kxe="false">{}</Password></LogonRequest>"#,
        LOGON_NAMESPACE,
        xml_escape(user),
        xml_escape(password)
    )
}

/// Pulls the session token out of a LogonResponse document.
///
/// Accepts the element with or without a namespace prefix (`<X-API-Session>`,
/// `<ns2:X-API-Session>`), quoted attribute values containing `>`, and treats a
/// self-closing element as carrying no token.
fn extract_session_token(body: &str) -> Option<String> {
    let mut search_from = 0;
    while let Some(found) = body[search_from..].find(SESSION_HEADER) {
        let name_start = search_from + found;
        let name_end = name_start + SESSION_HEADER.len();
        search_from = name_end;

        let before = &body[..name_start];
        let prefix_start = before.rfind(|c: char| c == '<' || c.is_whitespace() || c == '>')?;
        let is_open_tag = before.as_bytes()[prefix_start] == b'<'
            && before[prefix_start + 1..]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == ':' || c == '_' || c == '-');
        let terminated = body[name_end..]
            .chars()
            .next()
            .is_some_and(|c| c == '>' || c == '/' || c.is_whitespace());
        if !is_open_tag || !terminated {
            continue;
        }

        let tag_end = name_end + find_tag_end(&body[name_end..])?;
        if body[..tag_end].ends_with('/') {
            return None;
        }
        let content = &body[tag_end + 1..];
        let close = content.find("</")?;
        let token = content[..close].trim();
        return (!token.is_empty()).then(|| token.to_string());
    }
    None
}

/// Offset of the `>` closing a start tag, skipping quoted attribute values
fn find_tag_end(tag: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in tag.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if c == q => quote = None,
            (None, '>') => return Some(i),
            _ => {}
        }
    }
    None
}

// HMC quick API response structures

#[derive(Debug, Deserialize)]
struct QuickManagedSystem {
    #[serde(rename = "UUID")]
    uuid: String,
    #[serde(rename = "SystemName")]
    system_name: String,
    #[serde(rename = "MTMS", default)]
    mtms: Option<String>,
    #[serde(rename = "MachineType", default)]
    machine_type: Option<String>,
    #[serde(rename = "Model", default)]
    model: Option<String>,
    #[serde(rename = "SerialNumber", default)]
    serial_number: Option<String>,
}

impl QuickManagedSystem {
    fn into_domain(self, host: &str) -> Result<ManagedSystem, FetchError> {
        let mtms = match (&self.mtms, &self.machine_type, &self.model, &self.serial_number) {
            (Some(mtms), _, _, _) => mtms.parse::<Mtms>(),
            (None, Some(machine_type), Some(model), Some(serial)) => {
                Mtms::new(machine_type.as_str(), model.as_str(), serial.as_str())
            }
            _ => Err(anyhow::anyhow!("no MTMS reported")),
        }
        .map_err(|e| {
            FetchError::protocol(host, format!("managed system {}: {}", self.system_name, e))
        })?;

        Ok(ManagedSystem::new(self.system_name, mtms, self.uuid, host))
    }
}

#[derive(Debug, Deserialize)]
struct QuickPartition {
    #[serde(rename = "PartitionName")]
    name: String,
    #[serde(rename = "PartitionID")]
    id: u32,
    #[serde(rename = "PartitionType", default)]
    partition_type: String,
    #[serde(rename = "PartitionState", default)]
    state: Option<String>,
    #[serde(rename = "OperatingSystemVersion", default)]
    os_version: Option<String>,
    #[serde(rename = "ResourceMonitoringIPAddress", default)]
    ip_address: Option<String>,
    #[serde(rename = "UUID", default)]
    uuid: Option<String>,
    #[serde(rename = "AssociatedGroups", default)]
    associated_groups: Vec<String>,
}

impl QuickPartition {
    fn into_record(self, is_vios: bool) -> PartitionRecord {
        PartitionRecord {
            name: self.name,
            id: self.id,
            partition_type: self.partition_type,
            state: self.state,
            os_version: self.os_version,
            ip_address: self.ip_address,
            uuid: self.uuid,
            associated_groups: self.associated_groups,
            is_vios,
        }
    }
}

/// Parses a quick managed-system collection body
///
/// The fixture transport stores the same documents on disk.
pub(crate) fn parse_managed_systems(host: &str, body: &str) -> Result<Vec<ManagedSystem>, FetchError> {
    let quick: Vec<QuickManagedSystem> = serde_json::from_str(body)
        .map_err(|e| FetchError::protocol(host, format!("managed systems: {}", e)))?;
    quick.into_iter().map(|s| s.into_domain(host)).collect()
}

/// Parses a quick partition collection body
pub(crate) fn parse_partitions(
    host: &str,
    body: &str,
    is_vios: bool,
) -> Result<Vec<PartitionRecord>, FetchError> {
    let quick: Vec<QuickPartition> = serde_json::from_str(body)
        .map_err(|e| FetchError::protocol(host, format!("partitions: {}", e)))?;
    Ok(quick.into_iter().map(|p| p.into_record(is_vios)).collect())
}
