// src/dom/webdriver.rs
//
// Minimal W3C WebDriver client (blocking). Just the endpoints the extractor
// needs: status, session, navigate, find elements, text, attribute, click.

use std::thread;
use std::time::{Duration, Instant};

use reqwest::Method;
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{Value, json};

use super::{DomError, Element, TableDom};
use crate::config::consts::{DRIVER_HTTP_TIMEOUT_MS, DRIVER_POLL_MS};
use crate::config::options::DriverOptions;
use crate::error::RunError;

/// W3C element reference: `{"element-6066-…": "<id>"}`.
#[derive(Deserialize)]
struct WireElement {
    #[serde(rename = "element-6066-11e4-a52e-4f735466cecf")]
    id: String,
}

#[derive(Deserialize)]
struct WireError {
    error: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize)]
struct WireSession {
    #[serde(rename = "sessionId")]
    session_id: String,
}

#[derive(Deserialize)]
struct WireStatus {
    #[serde(default)]
    ready: bool,
    #[serde(default)]
    message: String,
}

pub struct WebDriverDom {
    client: Client,
    base: String,
    session: String,
    /// Created by us, so deleted on drop. Attached sessions are left alone.
    owned: bool,
}

impl WebDriverDom {
    /// Wait for the driver to report ready (one deadline), then create or
    /// attach to a session and optionally open `opts.url`.
    pub fn connect(opts: &DriverOptions) -> Result<Self, RunError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(DRIVER_HTTP_TIMEOUT_MS))
            .build()
            .map_err(|e| RunError::DependencyLoad(format!("http client: {e}")))?;
        let base = opts.endpoint.trim_end_matches('/').to_string();

        wait_ready(&client, &base, opts.ready_timeout)?;

        let (session, owned) = match &opts.session {
            Some(id) => {
                logf!("WebDriver: attaching to session {id}");
                (id.clone(), false)
            }
            None => {
                let caps = capabilities(&opts.browser, opts.headless);
                let value = send(&client, Method::POST, &format!("{base}/session"), Some(caps))
                    .map_err(|e| RunError::DependencyLoad(format!("new session: {e}")))?;
                let s: WireSession = serde_json::from_value(value)
                    .map_err(|e| RunError::DependencyLoad(format!("new session: {e}")))?;
                logf!("WebDriver: session {} ({})", s.session_id, opts.browser);
                (s.session_id, true)
            }
        };

        let dom = Self { client, base, session, owned };
        if let Some(url) = &opts.url {
            logf!("WebDriver: navigate → {url}");
            dom.call(Method::POST, "/url", Some(json!({ "url": url })))?;
        }
        Ok(dom)
    }

    fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<Value, DomError> {
        let url = format!("{}/session/{}{}", self.base, self.session, path);
        send(&self.client, method, &url, body)
    }

    fn find(&self, path: &str, selector: &str) -> Result<Vec<Element>, DomError> {
        let value = self.call(
            Method::POST,
            path,
            Some(json!({ "using": "css selector", "value": selector })),
        )?;
        let wire: Vec<WireElement> = serde_json::from_value(value)
            .map_err(|e| DomError::Protocol(format!("elements: {e}")))?;
        Ok(wire.into_iter().map(|w| Element::new(w.id)).collect())
    }
}

impl TableDom for WebDriverDom {
    fn query_all(&mut self, selector: &str) -> Result<Vec<Element>, DomError> {
        self.find("/elements", selector)
    }

    fn query_in(&mut self, parent: &Element, selector: &str) -> Result<Vec<Element>, DomError> {
        self.find(&format!("/element/{}/elements", parent.id()), selector)
    }

    fn text(&mut self, el: &Element) -> Result<String, DomError> {
        let value = self.call(Method::GET, &format!("/element/{}/text", el.id()), None)?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    fn attribute(&mut self, el: &Element, name: &str) -> Result<Option<String>, DomError> {
        let value = self.call(Method::GET, &format!("/element/{}/attribute/{name}", el.id()), None)?;
        Ok(match value {
            Value::Null => None,
            Value::String(s) => Some(s),
            other => Some(other.to_string()),
        })
    }

    fn click(&mut self, el: &Element) -> Result<(), DomError> {
        self.call(Method::POST, &format!("/element/{}/click", el.id()), Some(json!({})))?;
        Ok(())
    }
}

impl Drop for WebDriverDom {
    fn drop(&mut self) {
        if !self.owned { return; }
        let url = format!("{}/session/{}", self.base, self.session);
        match send(&self.client, Method::DELETE, &url, None) {
            Ok(_) => logd!("WebDriver: session {} closed", self.session),
            Err(e) => loge!("WebDriver: closing session {} failed: {e}", self.session),
        }
    }
}

/* ---------------- wire helpers ---------------- */

fn send(client: &Client, method: Method, url: &str, body: Option<Value>) -> Result<Value, DomError> {
    let req = client.request(method, url);
    let req = match body {
        Some(b) => req.json(&b),
        None => req,
    };
    let resp = req.send().map_err(|e| DomError::Transport(e.to_string()))?;
    let status = resp.status();
    let mut payload: Value = resp
        .json()
        .map_err(|e| DomError::Protocol(format!("{url}: {e}")))?;
    let value = payload.get_mut("value").map(Value::take).unwrap_or(Value::Null);

    if status.is_success() {
        return Ok(value);
    }
    match serde_json::from_value::<WireError>(value) {
        Ok(w) if w.error == "stale element reference" => Err(DomError::Stale(w.message)),
        Ok(w) => Err(DomError::Driver { error: w.error, message: w.message }),
        Err(_) => Err(DomError::Protocol(format!("{url}: HTTP {status}"))),
    }
}

fn wait_ready(client: &Client, base: &str, timeout: Duration) -> Result<(), RunError> {
    let start = Instant::now();
    let url = format!("{base}/status");

    loop {
        let last = match send(client, Method::GET, &url, None) {
            Ok(v) => match serde_json::from_value::<WireStatus>(v) {
                Ok(st) if st.ready => {
                    logd!("WebDriver: ready after {:?}", start.elapsed());
                    return Ok(());
                }
                Ok(st) => format!("not ready: {}", st.message),
                Err(e) => e.to_string(),
            },
            Err(e) => e.to_string(),
        };
        if start.elapsed() >= timeout {
            return Err(RunError::DependencyLoad(format!(
                "WebDriver at {base} not ready within {timeout:?} ({last})"
            )));
        }
        thread::sleep(Duration::from_millis(DRIVER_POLL_MS));
    }
}

fn capabilities(browser: &str, headless: bool) -> Value {
    let name = match browser.to_ascii_lowercase().as_str() {
        "edge" | "msedge" | "microsoftedge" => s!("MicrosoftEdge"),
        "chromium" | "chrome" => s!("chrome"),
        other => s!(other),
    };
    let mut always = json!({ "browserName": name });
    if headless {
        match name.as_str() {
            "chrome" => always["goog:chromeOptions"] = json!({ "args": ["--headless=new"] }),
            "MicrosoftEdge" => always["ms:edgeOptions"] = json!({ "args": ["--headless=new"] }),
            "firefox" => always["moz:firefoxOptions"] = json!({ "args": ["-headless"] }),
            _ => {}
        }
    }
    json!({ "capabilities": { "alwaysMatch": always } })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headless_chrome_capabilities() {
        let caps = capabilities("chrome", true);
        assert_eq!(caps["capabilities"]["alwaysMatch"]["browserName"], "chrome");
        assert_eq!(
            caps["capabilities"]["alwaysMatch"]["goog:chromeOptions"]["args"][0],
            "--headless=new"
        );
    }

    #[test]
    fn edge_alias_and_plain_firefox() {
        let caps = capabilities("Edge", true);
        assert_eq!(caps["capabilities"]["alwaysMatch"]["browserName"], "MicrosoftEdge");
        assert_eq!(caps["capabilities"]["alwaysMatch"]["ms:edgeOptions"]["args"][0], "--headless=new");

        let caps = capabilities("firefox", false);
        assert!(caps["capabilities"]["alwaysMatch"].get("moz:firefoxOptions").is_none());
    }

    #[test]
    fn element_reference_key() {
        let v = json!([{ "element-6066-11e4-a52e-4f735466cecf": "abc" }]);
        let els: Vec<WireElement> = serde_json::from_value(v).unwrap();
        assert_eq!(els[0].id, "abc");
    }
}
