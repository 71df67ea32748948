// Shared fixtures for the end-to-end run tests

use async_trait::async_trait;
use std::sync::Mutex;

use olx_watcher::config::{
    AlertConfig, AppConfig, DEFAULT_PRICE_SELECTOR, DEFAULT_TITLE_SELECTOR, EmailConfig,
    SearchConfig,
};
use olx_watcher::notifiers::{Mailer, OutgoingEmail};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const RECIPIENT: &str = "destinatar@example.com";
pub const KEYWORDS: &str = "iphone 15 pro";
pub const SEARCH_PATH: &str = "/q-iphone+15+pro/";

/// Mailer that keeps every message instead of talking to an SMTP server.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> olx_watcher::Result<()> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }
}

/// Configuration pointing the watcher at a local mock server
pub fn get_test_config(base_url: &str) -> AppConfig {
    AppConfig {
        olx: SearchConfig {
            url: format!("{}/", base_url),
            keywords: KEYWORDS.to_string(),
            title_selector: DEFAULT_TITLE_SELECTOR.to_string(),
            price_selector: DEFAULT_PRICE_SELECTOR.to_string(),
            user_agent: "OlxWatcher-Test/1.0".to_string(),
        },
        email: EmailConfig {
            smtp_server: "localhost".to_string(),
            smtp_port: 587,
            smtp_username: "watcher".to_string(),
            smtp_password: "secret".to_string(),
            from_address: "watcher@example.com".to_string(),
        },
        alert: AlertConfig {
            threshold: 3000.0,
            recipient: Some(RECIPIENT.to_string()),
        },
    }
}

pub fn home_page() -> String {
    r#"<html><head>
        <title>OLX.ro - Anunturi gratuite</title>
        <meta name="description" content="Cumpara si vinde pe OLX.ro">
    </head><body></body></html>"#
        .to_string()
}

pub fn results_page(listings: &[(&str, &str)]) -> String {
    let mut html = String::from("<html><body><table class=\"offers\">");
    for (title, price) in listings {
        html.push_str(&format!(
            r#"<tr><td><h3><a class="marginright5 link" href="/d/oferta"><strong>{}</strong></a></h3></td>
               <td><p class="price"><strong>{}</strong></p></td></tr>"#,
            title, price
        ));
    }
    html.push_str("</table></body></html>");
    html
}

/// Starts a mock OLX with a home page and a results page for `KEYWORDS`.
pub async fn start_site(listings: &[(&str, &str)]) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(home_page()))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(SEARCH_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(results_page(listings)))
        .expect(1)
        .mount(&server)
        .await;

    server
}
