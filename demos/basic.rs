// Import the main modules using prelude for convenience
use domainr_rs::prelude::*;

/// Basic usage example showing search and info lookups
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Basic Domainr API Usage Example");

    // DOMAINR_CLIENT_ID and DOMAINR_BASE_URL are both optional
    let client = from_env()?;
    match client.client_id() {
        Some(id) => println!("Using client id {}", id),
        None => println!("No client id configured"),
    }

    // Empty input is rejected before any request is made
    match client.search("").await {
        Ok(_) => println!("This should not happen"),
        Err(e) => println!("Expected validation error: {}", e),
    }

    println!("\nSearching for \"rust lang\"...");
    match client.search("rust lang").await? {
        Some(result) => {
            for candidate in &result.results {
                let availability = candidate
                    .availability
                    .as_ref()
                    .map(|a| a.to_string())
                    .unwrap_or_else(|| "unknown".to_string());
                println!("  {:<30} {}", candidate.domain, availability);
            }
        }
        None => println!("  no results"),
    }

    println!("\nLooking up rust-lang.org...");
    if let Some(info) = client.info("rust-lang.org").await? {
        println!("  availability: {:?}", info.availability);
        if let Some(tld) = &info.tld {
            println!("  tld: {} ({})", tld.domain, tld.iana_url.as_deref().unwrap_or("-"));
        }
        for registrar in &info.registrars {
            println!("  registrar: {}", registrar.name.as_deref().unwrap_or(&registrar.registrar));
        }
    }

    println!("\nExample complete!");
    Ok(())
}
