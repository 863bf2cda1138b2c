//! Fetch command - one orchestrated imagery fetch written to a file.

use std::path::PathBuf;

use terrascope::app::TerrascopeApp;
use terrascope::config::format_size;
use terrascope::imagery::ImageryRequest;

use super::load_app_config;
use crate::error::CliError;

/// Arguments for the fetch command.
pub struct FetchArgs {
    pub bbox: [f64; 4],
    pub layer: String,
    pub width: u32,
    pub height: u32,
    pub from: Option<String>,
    pub to: Option<String>,
    pub max_cloud: Option<f64>,
    pub output: PathBuf,
}

/// Parses `west,south,east,north`.
pub fn parse_bbox(value: &str) -> Result<[f64; 4], String> {
    let parts: Vec<f64> = value
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<Result<_, _>>()
        .map_err(|e| format!("bbox must be four comma-separated numbers: {}", e))?;

    parts
        .try_into()
        .map_err(|parts: Vec<f64>| format!("bbox needs 4 numbers, got {}", parts.len()))
}

/// Run the fetch command.
pub async fn run(args: FetchArgs) -> Result<(), CliError> {
    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && !parent.is_dir() {
            return Err(CliError::InvalidArgument(format!(
                "output directory does not exist: {}",
                parent.display()
            )));
        }
    }

    let (_, config) = load_app_config()?;

    let mut request = ImageryRequest::new(args.bbox, args.layer, args.width, args.height)
        .with_dates(args.from, args.to);
    if let Some(percent) = args.max_cloud {
        request = request.with_max_cloud_coverage(percent);
    }

    let app = TerrascopeApp::start(config).await?;
    let result = app.orchestrator().fetch_imagery(&request).await;
    app.shutdown().await;
    let outcome = result?;

    std::fs::write(&args.output, outcome.artifact.bytes()).map_err(CliError::Output)?;

    println!("Fingerprint:  {}", outcome.fingerprint);
    println!("Cached:       {}", if outcome.was_cached { "yes" } else { "no" });
    println!("Content type: {}", outcome.artifact.content_type());
    println!("Size:         {}", format_size(outcome.artifact.len() as u64));
    println!("Written to:   {}", args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bbox() {
        assert_eq!(
            parse_bbox("-122.5, 37.7,-122.3,37.8").unwrap(),
            [-122.5, 37.7, -122.3, 37.8]
        );
    }

    #[test]
    fn test_parse_bbox_wrong_arity() {
        assert!(parse_bbox("1,2,3").unwrap_err().contains("got 3"));
        assert!(parse_bbox("1,2,3,4,5").is_err());
    }

    #[test]
    fn test_parse_bbox_not_numbers() {
        assert!(parse_bbox("a,b,c,d").is_err());
    }
}
