use crate::generate::evidence::Evidence;
use crate::generate::types::Conversation;

/// Instructions for the writer model: evidence-only facts, Naver blog tone, strict JSON output.
pub fn base_system_prompt() -> String {
    let mut s = String::new();
    s.push_str("당신은 네이버 블로그 SEO 전문 작가입니다.\n\n");

    s.push_str("## 가장 중요한 규칙\n");
    s.push_str("1. 오직 \"참고 자료\"에 있는 정보만 사용하세요.\n");
    s.push_str("   - 참고 자료에 없는 내용은 쓰지 마세요.\n");
    s.push_str("   - 날짜, 수치, 사실은 참고 자료에 적힌 그대로 인용하세요.\n");
    s.push_str("   - 학습된 과거 지식이 아니라 제공된 최신 참고 자료를 기준으로 쓰세요.\n");
    s.push_str("   - 확실하지 않은 정보는 \"~라고 알려져 있어요\"처럼 표현하세요.\n");
    s.push_str("2. 참고 자료가 부족하면 솔직하게 말하세요.\n");
    s.push_str("   - \"현재 정보가 제한적이에요\"처럼 표현하고, 추측으로 채우지 마세요.\n\n");

    s.push_str("## 작성 규칙\n");
    s.push_str("1. 제목: 키워드 포함, 30자 이내, 후보 3개\n");
    s.push_str("2. 본문: 최소 1500자, 키워드를 5-8회 자연스럽게 포함\n");
    s.push_str("3. 소제목: ## 마크다운 3-5개, 소제목마다 3-5문단\n");
    s.push_str("4. 이미지: 300-400자마다 [이미지] 마커\n");
    s.push_str("5. 첫 문단: 공감형 도입부\n");
    s.push_str("6. 마지막: 행동 유도(CTA) 포함\n");
    s.push_str("7. 태그: 정확히 10개\n\n");

    s.push_str("## 한국어 톤\n");
    s.push_str("- 블로그 말투: ~해요, ~거든요, ~죠, ~네요, ~더라고요\n");
    s.push_str("- 번역체나 AI 같은 문체는 쓰지 마세요.\n");
    s.push_str("- 독자에게 말하듯 1인칭 경험을 나누는 스타일로 쓰세요.\n");
    s.push_str("- 나쁜 예: \"이 기능은 효율적인 협업을 가능하게 합니다\"\n");
    s.push_str("- 좋은 예: \"써보니까 진짜 편하더라고요, 특히 여러 명이 같이 작업할 때요\"\n\n");

    s.push_str("## 출력 형식 (JSON 객체 하나만 출력)\n");
    s.push_str(OUTPUT_SHAPE);
    s
}

const OUTPUT_SHAPE: &str = r#"{
  "titles": ["제목1", "제목2", "제목3"],
  "body": "마크다운 본문 (1500자 이상)",
  "tags": ["태그1", "태그2", "태그3", "태그4", "태그5", "태그6", "태그7", "태그8", "태그9", "태그10"],
  "seoScore": 85,
  "seoAnalysis": {
    "keywordDensity": "적정",
    "titleOptimization": "우수",
    "contentLength": "1800자",
    "readability": "우수",
    "ctaPresence": "포함"
  }
}"#;

/// User turn: the topic plus the evidence block, verbatim.
pub fn user_request(topic: &str, evidence: &Evidence) -> String {
    let mut s = String::new();
    s.push_str(&format!("주제: \"{}\"\n\n", topic));
    s.push_str("## 참고 자료 (웹 검색 결과)\n");
    s.push_str(evidence.as_text());
    s.push_str("\n\n");
    s.push_str(&format!(
        "중요: 위 참고 자료에 있는 정보만 사용해서 \"{}\" 주제의 네이버 SEO 블로그 글을 작성해주세요.\n",
        topic
    ));
    s.push_str("참고 자료에 없는 내용은 추측하지 마세요. 날짜와 수치는 참고 자료의 것을 정확히 인용하세요.");
    s
}

pub fn assemble(topic: &str, evidence: &Evidence) -> Conversation {
    Conversation::new(base_system_prompt(), user_request(topic, evidence))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::evidence::PLACEHOLDER_NO_RESULTS;
    use crate::generate::types::Role;

    #[test]
    fn system_prompt_names_every_output_field() {
        let p = base_system_prompt();
        for field in ["\"titles\"", "\"body\"", "\"tags\"", "\"seoScore\"", "\"seoAnalysis\"", "keywordDensity", "ctaPresence"] {
            assert!(p.contains(field), "missing {}", field);
        }
        assert!(p.contains("참고 자료"));
    }

    #[test]
    fn output_shape_is_valid_json() {
        let v: serde_json::Value = serde_json::from_str(OUTPUT_SHAPE).unwrap();
        assert_eq!(v["titles"].as_array().unwrap().len(), 3);
        assert_eq!(v["tags"].as_array().unwrap().len(), 10);
    }

    #[test]
    fn user_message_embeds_topic_and_evidence_verbatim() {
        let ev = Evidence::Found { text: "[1] 제목\n설명\nURL: https://x.example".into(), count: 1 };
        let conv = assemble("제주도 맛집 추천", &ev);
        assert_eq!(conv.system().role, Role::System);
        assert_eq!(conv.user().role, Role::User);
        assert!(conv.user().content.starts_with("주제: \"제주도 맛집 추천\""));
        assert!(conv.user().content.contains("[1] 제목\n설명\nURL: https://x.example"));
    }

    #[test]
    fn placeholder_evidence_is_passed_through() {
        let conv = assemble("topic", &Evidence::Unavailable(PLACEHOLDER_NO_RESULTS));
        assert!(conv.user().content.contains("## 참고 자료 (웹 검색 결과)\n(검색 결과 없음)\n"));
    }
}
