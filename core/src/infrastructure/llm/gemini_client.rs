use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::domain::{
    common::{LLMConfig, entities::app_errors::CoreError},
    dish_image::ports::ImageGenerationClient,
    recipe::{
        entities::{GroundedResponse, GroundingChunk, ImageAsset},
        ports::LLMClient,
    },
};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini `generateContent` and Imagen `predict` over REST.
#[derive(Debug, Clone)]
pub struct GeminiLLMClient {
    api_key: String,
    detection_model: String,
    search_model: String,
    parse_model: String,
    image_model: String,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

impl GeminiRequest {
    /// Temperature 0; dangerous content is blocked only at high probability.
    fn detection(prompt: String, system_instruction: String, image: ImageAsset) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: image.mime_type,
                            data: general_purpose::STANDARD.encode(&image.bytes),
                        },
                    },
                    Part::Text { text: prompt },
                ],
            }],
            system_instruction: Some(Content::text(system_instruction)),
            tools: Vec::new(),
            generation_config: Some(GenerationConfig { temperature: 0.0 }),
            safety_settings: vec![SafetySetting {
                category: "HARM_CATEGORY_DANGEROUS_CONTENT",
                threshold: "BLOCK_ONLY_HIGH",
            }],
        }
    }

    fn search(prompt: String, system_instruction: String) -> Self {
        Self {
            contents: vec![Content::text(prompt)],
            system_instruction: Some(Content::text(system_instruction)),
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
            generation_config: Some(GenerationConfig { temperature: 0.2 }),
            safety_settings: Vec::new(),
        }
    }

    fn text(prompt: String, system_instruction: String) -> Self {
        Self {
            contents: vec![Content::text(prompt)],
            system_instruction: Some(Content::text(system_instruction)),
            tools: Vec::new(),
            generation_config: None,
            safety_settings: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

impl Content {
    fn text(text: String) -> Self {
        Self {
            parts: vec![Part::Text { text }],
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ContentResponse>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    web_search_queries: Vec<String>,
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunkResponse>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunkResponse {
    web: Option<WebResponse>,
}

#[derive(Debug, Deserialize)]
struct WebResponse {
    #[serde(default)]
    title: String,
    #[serde(default)]
    uri: String,
}

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
}

impl GeminiResponse {
    /// Text of the first candidate, all parts joined.
    fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text = parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect::<String>();

        Some(text)
    }

    fn into_grounded(self) -> Result<GroundedResponse, CoreError> {
        let text = self
            .text()
            .ok_or_else(|| CoreError::ExternalServiceError("No response from LLM".to_string()))?;

        let metadata = self
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.grounding_metadata)
            .unwrap_or_default();

        Ok(GroundedResponse {
            text,
            web_search_queries: metadata.web_search_queries,
            grounding_chunks: metadata
                .grounding_chunks
                .into_iter()
                .filter_map(|chunk| chunk.web)
                .map(|web| GroundingChunk::new(web.title, web.uri))
                .collect(),
        })
    }
}

impl PredictResponse {
    fn into_images(self) -> Result<Vec<Vec<u8>>, CoreError> {
        self.predictions
            .into_iter()
            .filter_map(|prediction| prediction.bytes_base64_encoded)
            .map(|encoded| {
                general_purpose::STANDARD.decode(encoded).map_err(|e| {
                    tracing::error!("Failed to decode generated image: {}", e);
                    CoreError::ExternalServiceError(format!("Invalid image payload: {}", e))
                })
            })
            .collect()
    }
}

impl GeminiLLMClient {
    pub fn new(config: LLMConfig) -> Self {
        Self {
            api_key: config.gemini_api_key,
            detection_model: config.detection_model,
            search_model: config.search_model,
            parse_model: config.parse_model,
            image_model: config.image_model,
            client: Client::new(),
        }
    }

    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        model: &str,
        method: &str,
        body: &B,
    ) -> Result<R, CoreError> {
        let url = format!(
            "{}/models/{}:{}?key={}",
            GEMINI_API_BASE, model, method, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                tracing::error!("Gemini API request failed: {}", e);
                CoreError::ExternalServiceError(format!("LLM API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!(model = %model, "Gemini API error: {} - {}", status, error_text);
            return Err(CoreError::ExternalServiceError(format!(
                "LLM API returned error: {} - {}",
                status, error_text
            )));
        }

        response.json().await.map_err(|e| {
            let e = e.without_url();
            tracing::error!("Failed to parse Gemini response: {}", e);
            CoreError::ExternalServiceError(format!("Failed to parse LLM response: {}", e))
        })
    }

    async fn generate_content(
        &self,
        model: &str,
        request: GeminiRequest,
    ) -> Result<GeminiResponse, CoreError> {
        self.post(model, "generateContent", &request).await
    }
}

impl LLMClient for GeminiLLMClient {
    async fn generate_with_image(
        &self,
        prompt: String,
        system_instruction: String,
        image: ImageAsset,
    ) -> Result<String, CoreError> {
        let request = GeminiRequest::detection(prompt, system_instruction, image);

        self.generate_content(&self.detection_model, request)
            .await?
            .text()
            .ok_or_else(|| CoreError::ExternalServiceError("No response from LLM".to_string()))
    }

    async fn generate_with_search(
        &self,
        prompt: String,
        system_instruction: String,
    ) -> Result<GroundedResponse, CoreError> {
        let request = GeminiRequest::search(prompt, system_instruction);

        self.generate_content(&self.search_model, request)
            .await?
            .into_grounded()
    }

    async fn generate_with_text(
        &self,
        prompt: String,
        system_instruction: String,
    ) -> Result<String, CoreError> {
        let request = GeminiRequest::text(prompt, system_instruction);

        self.generate_content(&self.parse_model, request)
            .await?
            .text()
            .ok_or_else(|| CoreError::ExternalServiceError("No response from LLM".to_string()))
    }
}

impl ImageGenerationClient for GeminiLLMClient {
    async fn generate_images(
        &self,
        prompt: String,
        sample_count: u32,
    ) -> Result<Vec<Vec<u8>>, CoreError> {
        let request = PredictRequest {
            instances: vec![PredictInstance { prompt }],
            parameters: PredictParameters { sample_count },
        };

        let response: PredictResponse = self.post(&self.image_model, "predict", &request).await?;

        response.into_images()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_request_enables_google_search_tool() {
        let request = GeminiRequest::search("ingredients".to_string(), "be a chef".to_string());

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["tools"], serde_json::json!([{ "google_search": {} }]));
        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be a chef");
        assert_eq!(json["contents"][0]["parts"][0]["text"], "ingredients");
        assert_eq!(json["generationConfig"]["temperature"], 0.2_f32 as f64);
        assert!(json.get("safetySettings").is_none());
    }

    #[test]
    fn detection_request_is_deterministic_and_relaxes_dangerous_content() {
        let image = ImageAsset::new(bytes::Bytes::from_static(b"jpeg"), "image/jpeg", None);
        let request = GeminiRequest::detection("find food".to_string(), "labels only".to_string(), image);

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["generationConfig"]["temperature"], 0.0);
        assert_eq!(
            json["safetySettings"],
            serde_json::json!([{
                "category": "HARM_CATEGORY_DANGEROUS_CONTENT",
                "threshold": "BLOCK_ONLY_HIGH"
            }])
        );
        assert_eq!(json["contents"][0]["parts"][0]["inline_data"]["mime_type"], "image/jpeg");
        assert_eq!(json["contents"][0]["parts"][1]["text"], "find food");
    }

    #[test]
    fn plain_request_omits_tools_and_config() {
        let request = GeminiRequest::text("raw".to_string(), "parse".to_string());

        let json = serde_json::to_value(&request).unwrap();

        assert!(json.get("tools").is_none());
        assert!(json.get("generationConfig").is_none());
        assert!(json.get("safetySettings").is_none());
    }

    #[test]
    fn grounding_metadata_is_copied() {
        let response: GeminiResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{
                "content": { "parts": [{ "text": "# French toast" }, { "text": "\nSoak bread." }] },
                "groundingMetadata": {
                    "webSearchQueries": ["egg milk recipe"],
                    "groundingChunks": [
                        { "web": { "title": "allrecipes.com", "uri": "https://vertexaisearch.cloud.google.com/a" } },
                        { "retrievedContext": {} }
                    ]
                }
            }]
        }))
        .unwrap();

        let grounded = response.into_grounded().unwrap();

        assert_eq!(grounded.text, "# French toast\nSoak bread.");
        assert_eq!(grounded.web_search_queries, vec!["egg milk recipe"]);
        assert_eq!(grounded.grounding_chunks.len(), 1);
        assert_eq!(grounded.grounding_chunks[0].web.title, "allrecipes.com");
    }

    #[test]
    fn missing_grounding_metadata_gives_empty_lists() {
        let response: GeminiResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "Omelette" }] } }]
        }))
        .unwrap();

        let grounded = response.into_grounded().unwrap();

        assert_eq!(grounded.text, "Omelette");
        assert!(grounded.web_search_queries.is_empty());
        assert!(grounded.grounding_chunks.is_empty());
    }

    #[test]
    fn no_candidates_is_an_error() {
        let response: GeminiResponse = serde_json::from_value(serde_json::json!({})).unwrap();

        assert!(matches!(
            response.into_grounded(),
            Err(CoreError::ExternalServiceError(_))
        ));
    }

    #[test]
    fn predictions_are_decoded_in_order() {
        let response: PredictResponse = serde_json::from_value(serde_json::json!({
            "predictions": [
                { "bytesBase64Encoded": general_purpose::STANDARD.encode(b"one"), "mimeType": "image/png" },
                { "bytesBase64Encoded": general_purpose::STANDARD.encode(b"two"), "mimeType": "image/png" }
            ]
        }))
        .unwrap();

        assert_eq!(
            response.into_images().unwrap(),
            vec![b"one".to_vec(), b"two".to_vec()]
        );
    }

    #[test]
    fn predict_request_sets_sample_count() {
        let request = PredictRequest {
            instances: vec![PredictInstance {
                prompt: "Extremely minimalistic photograph of Soup.".to_string(),
            }],
            parameters: PredictParameters { sample_count: 4 },
        };

        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["parameters"]["sampleCount"], 4);
        assert_eq!(
            json["instances"][0]["prompt"],
            "Extremely minimalistic photograph of Soup."
        );
    }
}
