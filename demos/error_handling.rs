use domainr_rs::{DomainrClient, DomainrError, LookupEvent, SearchResult};
use tokio::sync::mpsc;

// Each lookup form reports failures differently
fn describe(err: &DomainrError) -> &'static str {
    if err.is_invalid_argument() {
        "invalid argument"
    } else if err.is_decode() {
        "undecodable response"
    } else if err.is_transport() {
        "transport failure"
    } else {
        "other"
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Nothing listens here, so every request fails at the transport level
    let client = DomainrClient::new()
        .with_base_url("http://127.0.0.1:9")?
        .with_client_id("demo");

    println!("Strict form:");
    match client.search("example").await {
        Ok(result) => println!("  result: {:?}", result),
        Err(e) => {
            println!("  {}: {}", describe(&e), e);
            if let Some(loc) = e.location() {
                println!("  raised at {}", loc);
            }
        }
    }

    println!("\nTask form:");
    match client.search_task("example").await {
        Ok(None) => println!("  no result"),
        Ok(Some(result)) => println!("  result: {:?}", result),
        Err(e) => println!("  {}: {}", describe(&e), e),
    }

    println!("\nCallback form:");
    let (tx, mut rx) = mpsc::unbounded_channel::<LookupEvent<SearchResult>>();
    for term in ["alpha", "beta"] {
        let tx = tx.clone();
        client.search_with_callback(term, move |event| {
            let _ = tx.send(event);
        })?;
    }
    drop(tx);

    while let Some(event) = rx.recv().await {
        match event {
            LookupEvent::Completed(result) => println!("  completed: {:?}", result.map(|r| r.query)),
            LookupEvent::Failed(e) => println!("  failed ({}): {}", describe(&e), e),
        }
    }

    println!("\nInvalid input:");
    if let Err(e) = client.info_with_callback("", |_| {}) {
        println!("  {}: {}", describe(&e), e);
    }

    Ok(())
}
