//! Test fixtures and factory functions for creating exam documents.

use exam_core::parser::DELIMITER;

/// One well-formed question block.
///
/// Question `i` has options A-D, answer `answers` and a timestamp `i` minutes
/// after 2024-01-01 08:00.
pub fn question_block(i: usize, answers: &str) -> String {
    format!(
        "## Examtopics\n\
         Question {i}: which option is right?\n\
         \n\
         **A:** Option A of {i}\n\
         **B:** Option B of {i}\n\
         **C:** Option C of {i}\n\
         **D:** Option D of {i}\n\
         \n\
         **Answer: {answers}**\n\
         **Timestamp: 2024-01-01 08:{i:02}:00**\n"
    )
}

/// Join blocks with the delimiter line.
pub fn exam_document(blocks: &[String]) -> String {
    let separator = format!("\n{DELIMITER}\n\n");
    blocks.join(&separator)
}

/// Generate a document with `num_questions` valid questions, all answered `B`.
pub fn sample_exam_content(num_questions: usize) -> String {
    let blocks: Vec<_> = (0..num_questions).map(|i| question_block(i, "B")).collect();
    exam_document(&blocks)
}

/// A block with no timestamp marker.
pub fn block_without_timestamp() -> String {
    "Where is the timestamp?\n**A:** Gone\n**Answer: A**\n".to_string()
}
