// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;

use crate::api::{MsaService, TemplateService, TicketReply};
use crate::archive::unpack_tar_gz;
use crate::config::FetchConfig;
use crate::errors::MsaFetchError;
use crate::job::Mode;

/// Blocking HTTP client for the MSA server and the template server.
pub struct HttpService {
    client: Client,
    host_url: String,
    template_host_url: String,
}

impl HttpService {
    pub fn new(config: &FetchConfig) -> Result<Self, MsaFetchError> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(HttpService {
            client,
            host_url: config.host_url.trim_end_matches('/').to_string(),
            template_host_url: config.template_host_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.host_url, path)
    }
}

impl MsaService for HttpService {
    fn submit(&self, query: &str, mode: Mode) -> Result<TicketReply, MsaFetchError> {
        let url = self.url(mode.endpoint());
        debug!("POST {} (mode '{}')", url, mode.as_str());
        let body = self
            .client
            .post(&url)
            .form(&[("q", query), ("mode", mode.as_str())])
            .send()?
            .text()?;
        Ok(TicketReply::from_body(&body))
    }

    fn status(&self, ticket: &str) -> Result<TicketReply, MsaFetchError> {
        let url = self.url(&format!("ticket/{}", ticket));
        debug!("GET {}", url);
        let body = self.client.get(&url).send()?.text()?;
        Ok(TicketReply::from_body(&body))
    }

    fn download(&self, ticket: &str, dest: &Path) -> Result<(), MsaFetchError> {
        let url = self.url(&format!("result/download/{}", ticket));
        debug!("GET {}", url);
        let mut response = self.client.get(&url).send()?.error_for_status()?;

        let tmp_path = partial_path(dest);
        let mut writer = BufWriter::new(File::create(&tmp_path)?);
        let copied = response
            .copy_to(&mut writer)
            .map_err(MsaFetchError::from)
            .and_then(|_| writer.flush().map_err(MsaFetchError::from));
        if let Err(e) = copied {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
        drop(writer);
        fs::rename(&tmp_path, dest)?;
        Ok(())
    }
}

impl TemplateService for HttpService {
    fn fetch_templates(&self, pdb_ids: &[String], dest_dir: &Path) -> Result<(), MsaFetchError> {
        let url = format!("{}/template/{}", self.template_host_url, pdb_ids.join(","));
        debug!("GET {}", url);
        let response = self.client.get(&url).send()?.error_for_status()?;
        unpack_tar_gz(response, dest_dir)
    }
}

// Downloads land next to their destination and are renamed once complete.
fn partial_path(dest: &Path) -> PathBuf {
    let mut tmp_os: OsString = dest.as_os_str().to_os_string();
    tmp_os.push(".part");
    PathBuf::from(tmp_os)
}
