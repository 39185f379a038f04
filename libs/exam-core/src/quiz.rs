//! Sampling and scoring for exam sessions.

use crate::error::QuizError;
use crate::types::{Letter, QuestionCollection, QuestionRecord};
use chrono::NaiveDateTime;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of answering one question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub statement: String,
    pub options: BTreeMap<Letter, String>,
    pub user_answer: BTreeSet<Letter>,
    pub correct_answer: BTreeSet<Letter>,
    pub is_correct: bool,
}

impl QuestionResult {
    /// Correct options with their text, in letter order.
    pub fn correct_details(&self) -> Vec<(Letter, &str)> {
        self.correct_answer
            .iter()
            .filter_map(|letter| {
                self.options
                    .get(letter)
                    .map(|text| (*letter, text.as_str()))
            })
            .collect()
    }
}

/// Summary of a finished exam.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamReport {
    pub exam_date: NaiveDateTime,
    pub final_score_percent: f64,
    pub total_questions: usize,
    pub correct_count: usize,
    pub question_results: Vec<QuestionResult>,
}

impl ExamReport {
    pub fn new(question_results: Vec<QuestionResult>, exam_date: NaiveDateTime) -> Self {
        let total_questions = question_results.len();
        let correct_count = question_results.iter().filter(|r| r.is_correct).count();
        let final_score_percent = if total_questions == 0 {
            0.0
        } else {
            correct_count as f64 / total_questions as f64 * 100.0
        };

        Self {
            exam_date,
            final_score_percent,
            total_questions,
            correct_count,
            question_results,
        }
    }
}

/// Pick `count` distinct questions at random.
pub fn sample<'a, R: Rng + ?Sized>(
    collection: &'a QuestionCollection,
    count: usize,
    rng: &mut R,
) -> Result<Vec<&'a QuestionRecord>, QuizError> {
    if collection.is_empty() {
        return Err(QuizError::EmptyCollection);
    }
    if count == 0 {
        return Err(QuizError::ZeroSample);
    }
    if count > collection.len() {
        return Err(QuizError::SampleTooLarge {
            requested: count,
            available: collection.len(),
        });
    }

    Ok(collection.as_slice().choose_multiple(rng, count).collect())
}

/// Read a typed response such as `"a c"`, `"A, C"` or `"AC"` into letters.
///
/// Characters that are not letters are ignored.
pub fn parse_response(input: &str) -> BTreeSet<Letter> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .flat_map(str::chars)
        .filter_map(|c| Letter::new(c.to_ascii_uppercase()))
        .collect()
}

/// Score a response; it must match the answer set exactly.
pub fn evaluate(question: &QuestionRecord, response: BTreeSet<Letter>) -> QuestionResult {
    let is_correct = response == question.answers;

    QuestionResult {
        statement: question.statement.clone(),
        options: question.options.clone(),
        user_answer: response,
        correct_answer: question.answers.clone(),
        is_correct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn letters(s: &str) -> BTreeSet<Letter> {
        s.chars().filter_map(Letter::new).collect()
    }

    fn question(answers: &str) -> QuestionRecord {
        let options = "ABCD"
            .chars()
            .filter_map(Letter::new)
            .map(|l| (l, format!("Option {l}")))
            .collect();
        QuestionRecord {
            statement: "Which?".to_string(),
            options,
            answers: letters(answers),
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    fn collection(n: usize) -> QuestionCollection {
        QuestionCollection::from_records((0..n).map(|_| question("A")).collect())
    }

    #[test]
    fn test_parse_response() {
        assert_eq!(parse_response("a c"), letters("AC"));
        assert_eq!(parse_response(" B, d "), letters("BD"));
        assert_eq!(parse_response("CA"), letters("AC"));
        assert_eq!(parse_response("1 ?"), BTreeSet::new());
    }

    #[test]
    fn test_single_answer() {
        let q = question("B");
        assert!(evaluate(&q, letters("B")).is_correct);
        assert!(!evaluate(&q, letters("C")).is_correct);
    }

    #[test]
    fn test_multi_answer_requires_all_letters() {
        let q = question("AC");
        assert!(!evaluate(&q, letters("A")).is_correct);
        assert!(!evaluate(&q, letters("ACD")).is_correct);
        assert!(evaluate(&q, letters("CA")).is_correct);
    }

    #[test]
    fn test_correct_details() {
        let result = evaluate(&question("BD"), letters("B"));
        assert_eq!(
            result.correct_details(),
            vec![
                (Letter::new('B').unwrap(), "Option B"),
                (Letter::new('D').unwrap(), "Option D")
            ]
        );
    }

    #[test]
    fn test_report_score() {
        let q = question("A");
        let results = vec![
            evaluate(&q, letters("A")),
            evaluate(&q, letters("B")),
            evaluate(&q, letters("A")),
            evaluate(&q, letters("A")),
        ];
        let report = ExamReport::new(results, q.timestamp);
        assert_eq!(report.total_questions, 4);
        assert_eq!(report.correct_count, 3);
        assert_eq!(report.final_score_percent, 75.0);
    }

    #[test]
    fn test_empty_report() {
        let report = ExamReport::new(vec![], question("A").timestamp);
        assert_eq!(report.final_score_percent, 0.0);
    }

    #[test]
    fn test_sample_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let questions = collection(5);

        assert_eq!(sample(&questions, 3, &mut rng).unwrap().len(), 3);
        assert_eq!(sample(&questions, 5, &mut rng).unwrap().len(), 5);
        assert_eq!(sample(&questions, 0, &mut rng), Err(QuizError::ZeroSample));
        assert_eq!(
            sample(&questions, 6, &mut rng),
            Err(QuizError::SampleTooLarge { requested: 6, available: 5 })
        );
        assert_eq!(
            sample(&QuestionCollection::default(), 1, &mut rng),
            Err(QuizError::EmptyCollection)
        );
    }

    #[test]
    fn test_sample_does_not_repeat() {
        let mut rng = StdRng::seed_from_u64(42);
        let questions = collection(10);
        let picked = sample(&questions, 10, &mut rng).unwrap();
        let mut addresses: Vec<_> = picked.iter().map(|q| *q as *const QuestionRecord).collect();
        addresses.sort();
        addresses.dedup();
        assert_eq!(addresses.len(), 10);
    }
}
