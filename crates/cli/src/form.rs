// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Transient task-selection form.
//!
//! `pw create` serves a single-purpose page on localhost: one checkbox per
//! task, one submit button. The server lives exactly as long as one
//! submission. The POST connection stays open while the batch submits so
//! the browser can be redirected to the review thread (or shown the
//! failure) afterwards.

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};

pub struct FormServer {
    listener: TcpListener,
    pub url: String,
}

/// A submitted selection whose browser is still waiting for a response.
pub struct PendingSubmission {
    stream: TcpStream,
    pub tasks: Vec<String>,
}

impl FormServer {
    pub async fn bind(port: u16) -> Result<Self> {
        let listener = TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("cannot bind form server on port {port}"))?;
        let port = listener.local_addr().context("cannot read form server address")?.port();
        Ok(Self { listener, url: format!("http://localhost:{port}") })
    }

    /// Serve the form until a selection is POSTed.
    ///
    /// GET requests (re)render the form; the first POST resolves. The
    /// connection is returned still open for [`finish`] or [`fail`].
    pub async fn collect_selection(&self, tasks: &[String]) -> Result<PendingSubmission> {
        loop {
            let (mut stream, _) = self.listener.accept().await.context("form server accept failed")?;
            match handle_request(&mut stream, tasks).await {
                Ok(Some(selected)) => return Ok(PendingSubmission { stream, tasks: selected }),
                Ok(None) => {}
                Err(e) => tracing::debug!(error = %e, "form connection error"),
            }
        }
    }
}

/// Redirect the waiting browser to the review thread.
pub async fn finish(mut pending: PendingSubmission, redirect_url: &str) -> Result<()> {
    let response = format!(
        "HTTP/1.1 303 See Other\r\nLocation: {redirect_url}\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
    );
    pending.stream.write_all(response.as_bytes()).await?;
    pending.stream.shutdown().await?;
    Ok(())
}

/// Show the waiting browser a failure instead of redirecting.
pub async fn fail(mut pending: PendingSubmission, message: &str) -> Result<()> {
    let body = format!("<h1>Submission failed</h1><pre>{}</pre>", escape_html(message));
    let response = format!(
        "HTTP/1.1 500 Internal Server Error\r\nContent-Type: text/html\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
        body.len()
    );
    pending.stream.write_all(response.as_bytes()).await?;
    pending.stream.shutdown().await?;
    Ok(())
}

/// Handle one HTTP request. `Some(tasks)` for a POST, `None` after a GET.
async fn handle_request(stream: &mut TcpStream, tasks: &[String]) -> Result<Option<Vec<String>>> {
    let mut reader = BufReader::new(&mut *stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).await?;

    let mut content_length = 0usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).await? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
    }

    if request_line.starts_with("POST") {
        let mut body = vec![0u8; content_length];
        reader.read_exact(&mut body).await?;
        let selected = parse_form_body(&String::from_utf8_lossy(&body), tasks);
        return Ok(Some(selected));
    }

    let body = render_form(tasks);
    let response = format!(
        "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(response.as_bytes()).await?;
    Ok(None)
}

/// Checked task names, in form order. Unknown names are dropped and
/// duplicates keep their first occurrence.
fn parse_form_body(body: &str, known: &[String]) -> Vec<String> {
    let mut selected = Vec::new();
    for pair in body.split('&') {
        let mut parts = pair.splitn(2, '=');
        let (Some(key), Some(value)) = (parts.next(), parts.next()) else {
            continue;
        };
        if value != "on" {
            continue;
        }
        let key = url_decode(key);
        if known.contains(&key) && !selected.contains(&key) {
            selected.push(key);
        }
    }
    selected
}

fn render_form(tasks: &[String]) -> String {
    let mut html = String::from(
        "<!doctype html><html><body>\
         <form method=\"POST\" onsubmit=\"setTimeout(() => \
         document.body.innerHTML = '<h1>Please wait...</h1>', 10); return true;\">",
    );
    for task in tasks {
        let name = escape_html(task);
        html.push_str(&format!(
            "<div><input type=\"checkbox\" id=\"{name}\" name=\"{name}\">\
             <label for=\"{name}\">{name}</label></div>"
        ));
    }
    html.push_str("<br><input type=\"submit\" value=\"Submit\"></form></body></html>");
    html
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

fn url_decode(s: &str) -> String {
    let mut out = Vec::with_capacity(s.len());
    let mut bytes = s.bytes();
    while let Some(b) = bytes.next() {
        match b {
            b'+' => out.push(b' '),
            b'%' => match (bytes.next().and_then(hex_val), bytes.next().and_then(hex_val)) {
                (Some(hi), Some(lo)) => out.push(hi << 4 | lo),
                _ => out.push(b'%'),
            },
            other => out.push(other),
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_val(b: u8) -> Option<u8> {
    (b as char).to_digit(16).map(|d| d as u8)
}

#[cfg(test)]
#[path = "form_tests.rs"]
mod tests;
