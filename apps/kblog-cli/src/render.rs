use kblog_types::GenerationResult;

/// Zero-based index for a 1-based `--title` choice, clamped to the candidates on offer.
pub fn title_index(requested: usize, available: usize) -> usize {
    requested.clamp(1, available.max(1)) - 1
}

/// Post ready to paste, followed by the title candidates and the SEO summary.
pub fn render_post(post: &GenerationResult, title_index: usize, remaining: u32) -> String {
    let mut s = post.compose_post(title_index);
    s.push_str("\n\n---\n제목 후보:\n");
    for (i, t) in post.titles.iter().enumerate() {
        let mark = if i == title_index { "*" } else { " " };
        s.push_str(&format!("{} {}. {}\n", mark, i + 1, t));
    }
    let a = &post.seo_analysis;
    s.push_str(&format!("\nSEO 점수: {}\n", post.seo_score));
    s.push_str(&format!("- 키워드 밀도: {}\n", a.keyword_density));
    s.push_str(&format!("- 제목 최적화: {}\n", a.title_optimization));
    s.push_str(&format!("- 글 길이: {}\n", a.content_length));
    s.push_str(&format!("- 가독성: {}\n", a.readability));
    s.push_str(&format!("- CTA: {}\n", a.cta_presence));
    s.push_str(&format!("\n오늘 남은 횟수: {}회\n", remaining));
    s
}
