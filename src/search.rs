//! Search orchestration: criteria in, restaurant records out.
//!
//! One user-initiated search is one `generateContent` call with the Google
//! Maps tool attached. The response text and place citations are then
//! reconciled by [`crate::parse`]. There is no retry: transport and API
//! failures propagate unchanged, and a response that carries no place
//! citations yields an empty result list rather than a loosely parsed one,
//! so every returned record has a real map link.

use tracing::{debug, instrument};

use crate::{
    client::Gemini,
    criteria::SearchCriteria,
    parse::{self, RestaurantRecord},
    tools::{LatLng, RetrievalConfig, Tool, ToolConfig},
    Result,
};

/// Persona and response-language instruction for the concierge
pub const SYSTEM_INSTRUCTION: &str = "You are a helpful gourmet concierge for Tokyo. \
    You speak Traditional Chinese (繁體中文) for the descriptions but keep technical labels \
    in English if needed. Always provide specific, real places using Google Maps.";

const TEMPERATURE: f32 = 0.7;

/// Restaurant discovery over a Gemini client
#[derive(Clone)]
pub struct RestaurantSearch {
    client: Gemini,
}

impl RestaurantSearch {
    /// Create a new search service over an existing client
    pub fn new(client: Gemini) -> Self {
        Self { client }
    }

    /// Run one search
    ///
    /// `location` is the device coordinate when the caller managed to acquire
    /// one; it only takes effect while `criteria.use_location` is set,
    /// otherwise the named area drives the search. A denied or timed-out
    /// location acquisition upstream simply passes `None` here.
    #[instrument(skip_all, fields(
        area = %criteria.area,
        cuisine = %criteria.cuisine,
        located = location.is_some(),
    ))]
    pub async fn search(
        &self,
        criteria: &SearchCriteria,
        location: Option<LatLng>,
    ) -> Result<Vec<RestaurantRecord>> {
        let located = if criteria.use_location { location } else { None };
        let prompt = build_prompt(criteria, located);

        let mut builder = self
            .client
            .generate_content()
            .with_system_instruction(SYSTEM_INSTRUCTION)
            .with_user_message(prompt)
            .with_temperature(TEMPERATURE)
            .with_tool(Tool::google_maps(None));
        if let Some(coord) = located {
            builder = builder.with_tool_config(ToolConfig {
                retrieval_config: Some(RetrievalConfig {
                    lat_lng: Some(coord),
                }),
            });
        }

        let response = builder.execute().await?;
        let text = response.text();
        let chunks = response.grounding_chunks();
        debug!(
            chunk_count = chunks.len(),
            text_len = text.len(),
            "received grounded response"
        );

        if parse::place_references(chunks).is_empty() {
            // Ungrounded, text-only answers are discarded rather than parsed.
            debug!("no place citations in response, returning no results");
            return Ok(Vec::new());
        }

        Ok(parse::assemble(&text, chunks))
    }
}

/// Compose the outbound prompt, including the mandated output template
fn build_prompt(criteria: &SearchCriteria, location: Option<LatLng>) -> String {
    let location_str = match location {
        Some(coord) => format!(
            "near the user's current location (Lat: {}, Lng: {})",
            coord.latitude, coord.longitude
        ),
        None => format!("in {}", criteria.area),
    };
    let open_now = if criteria.open_now {
        "\n- Must be Open Now"
    } else {
        ""
    };

    format!(
        "I need to find the best 3-4 restaurants {location_str}.\n\
         \n\
         Criteria:\n\
         - Cuisine: {cuisine}\n\
         - Purpose: {purpose}\n\
         - Budget: {budget}{open_now}\n\
         \n\
         Please use Google Maps to find real places.\n\
         \n\
         CRITICAL: You MUST format the output strictly as follows for EACH restaurant found so I can parse it:\n\
         \n\
         ### [Restaurant Name from Maps]\n\
         **Rating**: [Number, e.g. 4.5]\n\
         **Budget**: [Price range]\n\
         **Features**: [3 keywords, comma separated]\n\
         **Intro**: [A compelling paragraph describing the vibe, food, and why it fits the purpose. Approx 80-100 words.]\n\
         \n\
         Do not include any other conversational text before or after the list.",
        cuisine = criteria.cuisine,
        purpose = criteria.purpose,
        budget = criteria.budget,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use serde_json::json;

    fn criteria() -> SearchCriteria {
        SearchCriteria {
            area: "銀座 (Ginza)".to_string(),
            cuisine: "壽司 (Sushi)".to_string(),
            purpose: "商務宴請 (Business)".to_string(),
            budget: "¥6,000 ~ ¥10,000 (High-end)".to_string(),
            use_location: false,
            open_now: false,
        }
    }

    #[test]
    fn prompt_uses_area_when_no_location() {
        let prompt = build_prompt(&criteria(), None);
        assert!(prompt.contains("in 銀座 (Ginza)"));
        assert!(prompt.contains("- Cuisine: 壽司 (Sushi)"));
        assert!(prompt.contains("- Budget: ¥6,000 ~ ¥10,000 (High-end)"));
        assert!(!prompt.contains("Open Now"));
        assert!(prompt.contains("### [Restaurant Name from Maps]"));
        assert!(prompt.contains("**Intro**:"));
    }

    #[test]
    fn prompt_embeds_coordinates_in_location_mode() {
        let prompt = build_prompt(&criteria(), Some(LatLng::new(35.6717, 139.765)));
        assert!(prompt.contains("Lat: 35.6717, Lng: 139.765"));
        assert!(!prompt.contains("in 銀座"));
    }

    #[test]
    fn prompt_adds_open_now_line_when_toggled() {
        let mut c = criteria();
        c.open_now = true;
        let prompt = build_prompt(&c, None);
        assert!(prompt.contains("- Must be Open Now"));
    }

    fn grounded_response_body() -> String {
        json!({
            "candidates": [{
                "content": {
                    "parts": [{
                        "text": "### Sushi Dai\n**Rating**: 4.8\n**Budget**: ¥3,000~¥6,000\n**Features**: Fresh, Authentic, Busy\n**Intro**: Famous stall.\n"
                    }],
                    "role": "model"
                },
                "finishReason": "STOP",
                "groundingMetadata": {
                    "groundingChunks": [{
                        "maps": {
                            "sourceId": "src-1",
                            "title": "Sushi Dai",
                            "uri": "https://maps.google.com/?cid=123",
                            "placeId": "p1"
                        }
                    }]
                }
            }],
            "modelVersion": "gemini-2.5-flash"
        })
        .to_string()
    }

    fn service_for(server: &mockito::ServerGuard) -> RestaurantSearch {
        let base_url = format!("{}/", server.url());
        let client = Gemini::with_base_url("test-key", base_url).unwrap();
        RestaurantSearch::new(client)
    }

    #[tokio::test]
    async fn search_assembles_records_from_grounded_response() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(mockito::Matcher::UrlEncoded(
                "key".into(),
                "test-key".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(grounded_response_body())
            .create_async()
            .await;

        let service = service_for(&server);
        let records = service.search(&criteria(), None).await.unwrap();

        mock.assert_async().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "p1");
        assert_eq!(records[0].rating, "4.8");
        assert_eq!(records[0].map_source.uri, "https://maps.google.com/?cid=123");
    }

    #[tokio::test]
    async fn ungrounded_response_yields_no_results() {
        let body = json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "Try Sushi Dai, it is lovely." }],
                    "role": "model"
                },
                "finishReason": "STOP"
            }]
        })
        .to_string();

        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let service = service_for(&server);
        let records = service.search(&criteria(), None).await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn api_failure_propagates_unchanged() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(500)
            .with_body("internal error")
            .create_async()
            .await;

        let service = service_for(&server);
        let err = service.search(&criteria(), None).await.unwrap_err();
        match err {
            Error::ApiError {
                status_code,
                message,
            } => {
                assert_eq!(status_code, 500);
                assert_eq!(message, "internal error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn location_mode_sends_retrieval_config() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/models/gemini-2.5-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .match_body(mockito::Matcher::PartialJson(json!({
                "toolConfig": {
                    "retrievalConfig": {
                        "latLng": { "latitude": 35.6717, "longitude": 139.765 }
                    }
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(grounded_response_body())
            .create_async()
            .await;

        let mut c = criteria();
        c.use_location = true;
        let service = service_for(&server);
        service
            .search(&c, Some(LatLng::new(35.6717, 139.765)))
            .await
            .unwrap();
        mock.assert_async().await;
    }
}
