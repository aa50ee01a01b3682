//! End-to-end restaurant search
//!
//! Runs one grounded search against the live Gemini API and prints the
//! assembled records with their map links. Requires `GEMINI_API_KEY`.

use tablescout::{Gemini, RestaurantSearch, SearchCriteria};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = Gemini::new(std::env::var("GEMINI_API_KEY")?)?;
    let service = RestaurantSearch::new(client);

    let criteria = SearchCriteria {
        area: "銀座 (Ginza)".to_string(),
        cuisine: "壽司 (Sushi)".to_string(),
        purpose: "商務宴請 (Business)".to_string(),
        budget: "¥6,000 ~ ¥10,000 (High-end)".to_string(),
        use_location: false,
        open_now: true,
    };

    println!("Searching: {} / {} / {}\n", criteria.area, criteria.cuisine, criteria.budget);

    let records = service.search(&criteria, None).await?;

    if records.is_empty() {
        println!("No grounded results. Try broadening the criteria.");
        return Ok(());
    }

    for record in &records {
        println!("{} — {} ({})", record.name, record.rating, record.budget);
        println!("  {}", record.features.join(" / "));
        println!("  {}", record.description);
        println!("  🗺️  {}\n", record.map_source.uri);
    }

    Ok(())
}
