// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `wirebench validate` command - Validate configuration file.

use std::path::Path;

use wirebench_core::{Config, ConfigLoader};

pub async fn execute(file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(file = %file.display(), "Validating configuration");

    match ConfigLoader::load_file(file) {
        Ok(config) => {
            print!("{}", render(&config));
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}

fn render(config: &Config) -> String {
    let server = &config.server;
    let bench = &config.bench;
    let warmup = bench.warmup.min(bench.requests.value());

    let mut out = String::new();
    out.push_str("✓ Configuration is valid\n\n");
    out.push_str("Server Settings:\n");
    out.push_str(&format!("  REST Address:       {}\n", server.rest_addr));
    out.push_str(&format!("  gRPC Address:       {}\n", server.grpc_addr));
    out.push_str(&format!(
        "  Shutdown Timeout:   {}ms\n",
        server.shutdown_timeout.as_millis()
    ));
    out.push('\n');
    out.push_str("Benchmark Settings:\n");
    out.push_str(&format!("  Mode:               {}\n", bench.mode));
    out.push_str(&format!("  REST Base:          {}\n", bench.base_url));
    out.push_str(&format!("  gRPC Target:        {}\n", bench.grpc_target));
    out.push_str(&format!("  Requests:           {}\n", bench.requests));
    out.push_str(&format!("  Concurrency:        {}\n", bench.concurrency));
    out.push_str(&format!("  Payload:            {} KiB\n", bench.payload_kb));
    out.push_str(&format!("  List Limit:         {}\n", bench.limit));
    out.push_str(&format!("  Warm-up:            {}\n", warmup));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_render_defaults() {
        let config = ConfigLoader::load_string("").unwrap();
        let text = render(&config);

        assert!(text.starts_with("✓ Configuration is valid"));
        assert!(text.contains("REST Address:       0.0.0.0:8080"));
        assert!(text.contains("Mode:               rest"));
        assert!(text.contains("Requests:           20000"));
        assert!(text.contains("Warm-up:            1000"));
    }

    #[test]
    fn test_render_caps_warmup() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "bench:\n  mode: GRPC\n  n: 10\n  warmup: 500").unwrap();

        let config = ConfigLoader::load_file(file.path()).unwrap();
        let text = render(&config);
        assert!(text.contains("Mode:               grpc"));
        assert!(text.contains("Warm-up:            10"));
    }
}
