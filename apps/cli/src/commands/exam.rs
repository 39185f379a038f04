//! Interactive exam sessions.

use super::CommandError;
use crate::state::AppState;
use crate::store::{BankRepository, BankSummary};
use chrono::Local;
use exam_core::{
    evaluate, parse_response, sample, ExamReport, Letter, QuestionRecord, QuestionResult,
    QuizError,
};
use rand::Rng;
use std::collections::BTreeSet;
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

const RULE_WIDTH: usize = 80;
const REPORT_DATE_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

type Result<T> = std::result::Result<T, CommandError>;

/// Prompts and feedback over a line-based terminal.
pub struct ExamSession<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ExamSession<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    fn prompt(&mut self, text: &str) -> Result<String> {
        write!(self.output, "{text}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(CommandError::InputClosed);
        }
        Ok(line.trim().to_string())
    }

    /// Ask until the user names one of `banks`.
    pub fn choose_bank(&mut self, banks: &[BankSummary]) -> Result<String> {
        if banks.is_empty() {
            return Err(CommandError::NoBanks);
        }

        writeln!(self.output, "Please choose one of the following question banks:")?;
        for bank in banks {
            writeln!(self.output, "  {} ({} questions)", bank.name, bank.question_count)?;
        }

        loop {
            let choice = self.prompt("Your choice: ")?;
            if banks.iter().any(|bank| bank.name == choice) {
                return Ok(choice);
            }
            writeln!(self.output, "The selected bank was not found!")?;
        }
    }

    /// Ask for a question count between 1 and `total`.
    pub fn ask_question_count(&mut self, total: usize) -> Result<usize> {
        loop {
            let answer = self.prompt(&format!(
                "How many questions would you like to attempt? (1-{total}): "
            ))?;
            match answer.parse::<usize>() {
                Ok(n) if (1..=total).contains(&n) => return Ok(n),
                Ok(_) => writeln!(
                    self.output,
                    "Please enter a number between 1 and {total}."
                )?,
                Err(_) => writeln!(self.output, "Invalid input. Please enter a number.")?,
            }
        }
    }

    /// Present one question and score the typed response.
    pub fn ask(
        &mut self,
        question: &QuestionRecord,
        number: usize,
        total: usize,
    ) -> Result<QuestionResult> {
        writeln!(self.output, "--- Question {number} of {total} ---")?;
        writeln!(self.output)?;
        writeln!(self.output, "  {}", question.statement.replace('\n', "\n  "))?;
        writeln!(self.output, "{}", "-".repeat(RULE_WIDTH))?;
        for (letter, text) in &question.options {
            writeln!(self.output, "  {letter}: {}", text.replace('\n', "\n      "))?;
        }

        let prompt = if question.is_multi_answer() {
            "\nEnter your answers (e.g., A B): "
        } else {
            "\nEnter your answer (e.g., A): "
        };
        let response = parse_response(&self.prompt(prompt)?);
        let result = evaluate(question, response);
        self.show_feedback(&result)?;
        Ok(result)
    }

    fn show_feedback(&mut self, result: &QuestionResult) -> Result<()> {
        if result.is_correct {
            writeln!(self.output, "\nCorrect!")?;
            return Ok(());
        }

        writeln!(self.output, "\nIncorrect.")?;
        writeln!(
            self.output,
            "  Your answer(s):     {}",
            join_letters(&result.user_answer)
        )?;
        writeln!(
            self.output,
            "  Correct answer(s):  {}",
            join_letters(&result.correct_answer)
        )?;
        writeln!(self.output, "\n  Correct Answer Details:")?;
        for (letter, text) in result.correct_details() {
            writeln!(self.output, "    {letter}: {text}")?;
        }
        Ok(())
    }

    /// Ask every question in order.
    pub fn run(&mut self, questions: &[&QuestionRecord]) -> Result<Vec<QuestionResult>> {
        let total = questions.len();
        let mut results = Vec::with_capacity(total);

        for (idx, question) in questions.iter().enumerate() {
            results.push(self.ask(question, idx + 1, total)?);
            if idx + 1 < total {
                self.prompt("\nPress Enter to continue to the next question...")?;
                writeln!(self.output)?;
            }
        }

        Ok(results)
    }

    pub fn show_summary(&mut self, report: &ExamReport) -> Result<()> {
        writeln!(self.output, "\n===== Exam Complete =====")?;
        writeln!(
            self.output,
            "You answered {} out of {} questions correctly.",
            report.correct_count, report.total_questions
        )?;
        writeln!(self.output, "Your final grade: {:.2}%", report.final_score_percent)?;
        Ok(())
    }
}

fn join_letters(letters: &BTreeSet<Letter>) -> String {
    letters
        .iter()
        .map(|l| l.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Run an exam from a stored bank and save the report.
///
/// Prompts for the bank and the question count when they are not given.
pub fn start_exam<R, W, G>(
    state: &AppState,
    bank: Option<&str>,
    count: Option<usize>,
    session: &mut ExamSession<R, W>,
    rng: &mut G,
) -> Result<(ExamReport, PathBuf)>
where
    R: BufRead,
    W: Write,
    G: Rng + ?Sized,
{
    let name = match bank {
        Some(name) => name.to_string(),
        None => session.choose_bank(&state.repository.list_banks()?)?,
    };
    let bank = state.repository.load_bank(&name)?;
    if bank.questions.is_empty() {
        return Err(QuizError::EmptyCollection.into());
    }

    writeln!(
        session.output,
        "There are a total of {} questions available.",
        bank.questions.len()
    )?;
    let count = match count {
        Some(count) => count,
        None => session.ask_question_count(bank.questions.len())?,
    };

    let questions = sample(&bank.questions, count, rng)?;
    tracing::debug!("Starting exam on {} with {} questions", bank.name, questions.len());

    let results = session.run(&questions)?;
    let report = ExamReport::new(results, Local::now().naive_local());
    session.show_summary(&report)?;

    let path = save_report(&state.config.results_dir, &report)?;
    writeln!(session.output, "\nResults saved to: {}", path.display())?;
    tracing::info!("Saved exam report to {}", path.display());

    Ok((report, path))
}

/// Write the report as `exam_results_<date>.json` in `dir`.
pub fn save_report(dir: &Path, report: &ExamReport) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(format!(
        "exam_results_{}.json",
        report.exam_date.format(REPORT_DATE_FORMAT)
    ));
    fs::write(&path, serde_json::to_string_pretty(report)?)?;
    Ok(path)
}
