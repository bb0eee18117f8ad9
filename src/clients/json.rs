use crate::bail;
use crate::runner::Lookup;
use crate::Error;
use crate::Record;
use crate::Report;
use crate::Type;
use async_trait::async_trait;
use http::header::*;
use http::HeaderValue;
use http::Method;
use http::Request;
use hyper::{Body, Client as HyperClient};
use hyper_alpn::AlpnConnector;
use log::{debug, warn};
use mime::Mime;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

pub const GOOGLE: &str = "https://dns.google/resolve";
pub const CLOUDFLARE: &str = "https://cloudflare-dns.com/dns-query";

// For use in Content-type and Accept headers
// Google actually uses "application/x-javascript", but Cloud Flare requires "application/dns-json".
// Since Google's API seems to accept either, we default to dns-json.
const CONTENT_TYPE_APPLICATION_DNS_JSON: &str = "application/dns-json";
const CONTENT_TYPE_APPLICATION_X_JAVASCRIPT: &str = "application/x-javascript";

// Every record the API returns is in the Internet class.
const CLASS_INTERNET: &str = "IN";

#[derive(Deserialize)]
#[serde(rename_all = "PascalCase")]
struct MessageJson {
    pub status: u32, // NOERROR - Standard DNS response code (32 bit integer).

    #[serde(default)]
    pub question: Vec<QuestionJson>,

    #[serde(default)] // Prefer empty Vec, over Optional
    pub answer: Vec<RecordJson>,

    #[serde(default)]
    pub authority: Vec<RecordJson>,

    #[serde(default)]
    pub additional: Vec<RecordJson>,

    pub comment: Option<String>,
}

impl From<MessageJson> for Report {
    fn from(m: MessageJson) -> Report {
        Report {
            questions: m.question.into_iter().map(Record::from).collect(),
            answers: m.answer.into_iter().map(Record::from).collect(),
            authorities: m.authority.into_iter().map(Record::from).collect(),
            additionals: m.additional.into_iter().map(Record::from).collect(),
        }
    }
}

// Basically a Question
#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
struct QuestionJson {
    pub name: String, // FQDN with trailing dot
    pub r#type: u16,  // A - Standard DNS RR type
}

impl From<QuestionJson> for Record {
    fn from(q: QuestionJson) -> Record {
        Record::question(&q.name, &Type::name_of(q.r#type), CLASS_INTERNET)
    }
}

// Basically a Record
#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
struct RecordJson {
    pub name: String,
    pub r#type: u16, // A - Standard DNS RR type

    #[serde(rename = "TTL")]
    pub ttl: u32,
    pub data: String,
}

impl From<RecordJson> for Record {
    fn from(r: RecordJson) -> Record {
        Record::new(
            &r.name,
            &Type::name_of(r.r#type),
            CLASS_INTERNET,
            &r.ttl.to_string(),
            &r.data,
        )
    }
}

/// Parses a JSON API response body.
fn parse_response(body: &[u8]) -> Result<Report, Error> {
    let m: MessageJson = serde_json::from_slice(body)?;

    if m.status != 0 {
        warn!("JSON API returned status {}", m.status);
    }
    if let Some(comment) = &m.comment {
        debug!("JSON API comment: {}", comment);
    }

    Ok(m.into())
}

/// Returns true if the content type's "essence" (just "type/subtype",
/// instead of "type/subtype+suffix; param=value...") is one the API uses.
fn is_json_content_type(content_type: &HeaderValue) -> bool {
    let essence = content_type
        .to_str()
        .ok()
        .and_then(|t| t.parse::<Mime>().ok());

    match essence {
        Some(mime) => {
            let essence = mime.essence_str();
            essence == CONTENT_TYPE_APPLICATION_DNS_JSON
                || essence == CONTENT_TYPE_APPLICATION_X_JAVASCRIPT
        }
        None => false,
    }
}

/// A client for DNS over HTTPS JSON APIs, whose answers become a [`Report`]
/// that the client under test can be compared against.
///
/// # Example
///
/// ```rust,no_run
/// use digdiff::clients::json;
/// use digdiff::Type;
///
/// #[tokio::main]
/// async fn main() -> Result<(), digdiff::Error> {
///     let report = json::Client::new(json::GOOGLE)?
///         .resolve("www.google.com", Type::A)
///         .await?;
///
///     println!("{}", report);
///     Ok(())
/// }
/// ```
///
/// See <https://developers.google.com/speed/public-dns/docs/doh/json> and
/// <https://developers.cloudflare.com/1.1.1.1/encrypted-dns/dns-over-https/make-api-requests/dns-json>
pub struct Client {
    server: Url,
}

impl Client {
    /// Creates a new Client for the API at `server`, for example [`GOOGLE`].
    pub fn new(server: &str) -> Result<Self, Error> {
        Ok(Self {
            server: server.parse()?,
        })
    }

    /// Looks up `name`, returning the records the API answered with.
    pub async fn resolve(&self, name: &str, r#type: Type) -> Result<Report, Error> {
        // Create a Alpn client, so our connection will upgrade to HTTP/2.
        let alpn = AlpnConnector::new();

        let client = HyperClient::builder()
            .pool_idle_timeout(Duration::from_secs(30))
            .http2_only(true)
            .build::<_, hyper::Body>(alpn);

        let mut url = self.server.clone();
        url.query_pairs_mut()
            .append_pair("name", name)
            .append_pair("type", &r#type.to_string())
            .append_pair("cd", "false")
            .append_pair("ct", CONTENT_TYPE_APPLICATION_DNS_JSON);

        // We have to do this wierd as_str().parse() thing because the
        // http::Uri doesn't provide a way to easily mutate or construct it.
        let uri: hyper::Uri = url.as_str().parse()?;

        debug!("Requesting {}", uri);

        let req = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(ACCEPT, CONTENT_TYPE_APPLICATION_DNS_JSON)
            .body(Body::empty())?;

        let resp = client.request(req).await?;

        if let Some(content_type) = resp.headers().get(CONTENT_TYPE) {
            if !is_json_content_type(content_type) {
                bail!(
                    InvalidData,
                    "recevied invalid content-type: {:?} expected {} or {}",
                    content_type,
                    CONTENT_TYPE_APPLICATION_DNS_JSON,
                    CONTENT_TYPE_APPLICATION_X_JAVASCRIPT,
                );
            }
        }

        if !resp.status().is_success() {
            bail!(
                InvalidData,
                "recevied unexpected HTTP status code: {:}",
                resp.status()
            );
        }

        let body = hyper::body::to_bytes(resp.into_body()).await?;
        parse_response(&body)
    }
}

#[async_trait]
impl Lookup for Client {
    async fn lookup(&self, name: &str, r#type: Type) -> Result<Report, Error> {
        self.resolve(name, r#type).await
    }
}
