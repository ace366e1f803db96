//! # 자막 트랙 해석
//!
//! 시청 페이지에 포함된 `ytInitialPlayerResponse`에서 자막 트랙 목록을 꺼내고,
//! 언어 우선순위에 맞는 트랙을 고른 뒤, json3 형식 자막을 한 줄 텍스트로 합칩니다.
//! 네트워크 호출은 `youtube.rs`가 하고, 이 파일은 순수 함수만 가집니다.

use serde::Deserialize;

const PLAYER_RESPONSE_MARKER: &str = "ytInitialPlayerResponse = ";

/// 자막 트랙 한 개
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// 자동 생성 자막이면 "asr"
    #[serde(default)]
    pub kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }

    /// "en"은 "en"과 "en-US" 모두에 일치합니다.
    fn matches_language(&self, language: &str) -> bool {
        self.language_code == language
            || self.language_code.split('-').next() == Some(language)
    }
}

#[derive(Debug, Deserialize)]
struct PlayerResponse {
    #[serde(default)]
    captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: TrackList,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackList {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

/// 시청 페이지 HTML에서 자막 트랙 목록을 꺼냅니다.
///
/// 마커 뒤에는 JSON 객체 하나와 그 뒤의 스크립트가 이어지므로,
/// `StreamDeserializer`로 첫 번째 JSON 값만 읽고 나머지는 무시합니다.
pub fn extract_caption_tracks(html: &str) -> Result<Vec<CaptionTrack>, String> {
    let start = html
        .find(PLAYER_RESPONSE_MARKER)
        .ok_or("player response not found in watch page")?
        + PLAYER_RESPONSE_MARKER.len();

    let player: PlayerResponse = serde_json::Deserializer::from_str(&html[start..])
        .into_iter::<PlayerResponse>()
        .next()
        .ok_or("player response is empty")?
        .map_err(|e| format!("malformed player response: {}", e))?;

    let tracks = player
        .captions
        .map(|c| c.player_captions_tracklist_renderer.caption_tracks)
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err("video has no caption tracks".to_string());
    }
    Ok(tracks)
}

/// 언어 우선순위대로 트랙을 고릅니다.
///
/// 같은 언어 안에서는 직접 작성된 자막을 자동 생성 자막보다 먼저 고릅니다.
pub fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|language| {
        let mut candidates = tracks.iter().filter(|t| t.matches_language(language));
        let manual = candidates.clone().find(|t| !t.is_generated());
        manual.or_else(|| candidates.next())
    })
}

/// json3 형식 자막 (`{"events": [{"segs": [{"utf8": "..."}]}]}`)
#[derive(Debug, Deserialize)]
pub struct Json3Transcript {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
struct Json3Event {
    #[serde(default)]
    segs: Vec<Json3Segment>,
}

#[derive(Debug, Deserialize)]
struct Json3Segment {
    #[serde(default)]
    utf8: String,
}

/// 자막 조각(event)마다 텍스트를 만들고, 빈 조각을 뺀 뒤 공백 하나로 이어 붙입니다.
///
/// 조각 안의 텍스트는 앞뒤 공백만 잘라내고 그대로 둡니다 (줄바꿈 포함).
pub fn transcript_text(transcript: &Json3Transcript) -> String {
    transcript
        .events
        .iter()
        .map(|event| {
            let line: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            line.trim().to_string()
        })
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(lang: &str, kind: Option<&str>) -> CaptionTrack {
        CaptionTrack {
            base_url: format!("https://example.com/{}", lang),
            language_code: lang.to_string(),
            kind: kind.map(str::to_string),
        }
    }

    fn langs(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn reads_tracks_from_watch_page() {
        let html = r#"<script>var ytInitialPlayerResponse = {"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://example.com/ja","languageCode":"ja","kind":"asr"},{"baseUrl":"https://example.com/en","languageCode":"en"}]}},"videoDetails":{}};var meta = {};</script>"#;

        let tracks = extract_caption_tracks(html).unwrap();

        assert_eq!(tracks.len(), 2);
        assert_eq!(tracks[0].language_code, "ja");
        assert!(tracks[0].is_generated());
        assert_eq!(tracks[1].base_url, "https://example.com/en");
    }

    #[test]
    fn page_without_captions_is_an_error() {
        let html = r#"ytInitialPlayerResponse = {"videoDetails":{}};"#;
        assert!(extract_caption_tracks(html).is_err());
        assert!(extract_caption_tracks("<html></html>").is_err());
    }

    #[test]
    fn language_preference_order_wins() {
        let tracks = vec![track("en", None), track("ja", Some("asr"))];

        let chosen = select_track(&tracks, &langs(&["ja", "en"])).unwrap();
        assert_eq!(chosen.language_code, "ja");

        let chosen = select_track(&tracks, &langs(&["en", "ja"])).unwrap();
        assert_eq!(chosen.language_code, "en");
    }

    #[test]
    fn manual_track_preferred_within_a_language() {
        let tracks = vec![track("ja", Some("asr")), track("ja", None)];

        let chosen = select_track(&tracks, &langs(&["ja"])).unwrap();
        assert!(!chosen.is_generated());
    }

    #[test]
    fn regional_codes_match_base_language() {
        let tracks = vec![track("en-US", None)];
        assert!(select_track(&tracks, &langs(&["ja", "en"])).is_some());
        assert!(select_track(&tracks, &langs(&["ja"])).is_none());
    }

    #[test]
    fn joins_fragments_with_single_spaces() {
        let json3: Json3Transcript = serde_json::from_str(
            r#"{"events":[
                {"tStartMs":0,"segs":[{"utf8":"テスト用字幕A"}]},
                {"tStartMs":1000,"segs":[{"utf8":"\n"}]},
                {"tStartMs":2000},
                {"tStartMs":3000,"segs":[{"utf8":"テスト用"},{"utf8":"字幕B\n続き"}]},
                {"tStartMs":4000,"segs":[{"utf8":"テスト用字幕C"}]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(
            transcript_text(&json3),
            "テスト用字幕A テスト用字幕B\n続き テスト用字幕C"
        );
    }

    #[test]
    fn fragment_text_is_kept_verbatim_apart_from_edges() {
        let json3: Json3Transcript = serde_json::from_str(
            r#"{"events":[
                {"segs":[{"utf8":"  [音楽]  "}]},
                {"segs":[{"utf8":"一行目\n二行目"},{"utf8":"  続き"}]}
            ]}"#,
        )
        .unwrap();

        assert_eq!(transcript_text(&json3), "[音楽] 一行目\n二行目  続き");
    }
}
