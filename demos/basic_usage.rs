use policyfts::{load_documents, DocumentFilter, DocumentType, SearchEngine, SearchIndex};
use std::sync::Arc;
use std::thread;

fn main() -> anyhow::Result<()> {
    println!("=== policyfts Basic Usage Example ===\n");

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/demos/policies.json");
    let documents = load_documents(path)?;

    // Build the index from the whole document set
    let mut engine = SearchEngine::new();
    engine.set_documents(documents.clone());
    println!("✓ Indexed {} documents\n", documents.len());

    // Example 1: Ranked search with match explanations
    println!("--- Example 1: Search for 'password requirements' ---");
    for (i, result) in engine.search("password requirements", 5).iter().enumerate() {
        println!("\n{}. [Score: {:.4}] {}", i + 1, result.score, result.document.name);
        for detail in &result.matches {
            println!("   {:<12} {:<12} {:.4}", detail.field, detail.text, detail.score);
        }
    }

    // Example 2: Typo falls back to fuzzy matching
    println!("\n\n--- Example 2: Fuzzy search for 'encripted devices' ---");
    for result in engine.search("encripted devices", 5) {
        let matched: Vec<&str> = result.matches.iter().map(|m| m.matched.as_str()).collect();
        println!("  {} (matched {:?})", result.document.name, matched);
    }

    // Example 3: Post-filtering by document type
    println!("\n\n--- Example 3: Onboarding documents about 'vpn setup' ---");
    let filter = DocumentFilter {
        document_type: Some(DocumentType::Onboarding),
        ..DocumentFilter::default()
    };
    for result in filter.apply(engine.search("vpn setup", 10)) {
        println!("  {} [{:.4}]", result.document.name, result.score);
    }

    // Example 4: Snapshots are shareable across threads
    println!("\n\n--- Example 4: Concurrent searches over one snapshot ---");
    let snapshot: Arc<SearchIndex> = engine.snapshot();
    let handles: Vec<_> = ["incident", "remote work", "mdm"]
        .into_iter()
        .map(|query| {
            let snapshot = Arc::clone(&snapshot);
            thread::spawn(move || (query, snapshot.search(query, 3).len()))
        })
        .collect();
    for handle in handles {
        if let Ok((query, hits)) = handle.join() {
            println!("  '{}' -> {} results", query, hits);
        }
    }

    // Example 5: Statistics
    println!("\n\n--- Example 5: Index Statistics ---");
    let stats = snapshot.stats();
    println!("Total documents: {}", stats.total_documents);
    println!("Total unique tokens: {}", stats.total_tokens);
    println!("Average postings per token: {:.2}", stats.avg_postings_per_token);

    println!("\n=== Example Complete ===");

    Ok(())
}
