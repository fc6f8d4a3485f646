//! Deterministic placeholder records for when model output is unusable
//!
//! Everything here is a pure function of the request parameters and the
//! record index, so the same request always yields the same records.

use crate::types::NormalizeParams;
use pathwise_domain::{
    ExamQuestion, NormalizedRecord, QuizQuestion, RecordKind, RecordOrigin, RoadmapPhase,
};
use std::ops::Range;

/// Options offered by every placeholder question
pub const PLACEHOLDER_OPTIONS: [&str; 4] = ["Option A", "Option B", "Option C", "Option D"];

const PLACEHOLDER_EXPLANATION: &str =
    "Placeholder question; the generated content could not be used.";

const ROADMAP_STAGES: &[(&str, &str)] = &[
    ("Foundations", "Learn the core vocabulary and set up your tools"),
    ("Core Concepts", "Study the central ideas and work through guided exercises"),
    ("Applied Practice", "Build small projects that combine the basics"),
    ("Advanced Topics", "Go deeper into performance, design and edge cases"),
    ("Specialization", "Pick a niche and study it in depth"),
    ("Capstone", "Ship a complete project and review it with peers"),
];

const ROADMAP_DURATION: &str = "4 weeks";

/// Exactly `params.count` fallback records
pub fn fallback_records(kind: RecordKind, params: &NormalizeParams) -> Vec<NormalizedRecord> {
    fallback_range(kind, params, 0..params.count)
}

/// Fallback records for the given index range, used to top up short lists
pub fn fallback_range(
    kind: RecordKind,
    params: &NormalizeParams,
    range: Range<usize>,
) -> Vec<NormalizedRecord> {
    range
        .map(|index| match kind {
            RecordKind::Roadmap => NormalizedRecord::from(roadmap_phase(params, index)),
            RecordKind::Quiz => NormalizedRecord::from(quiz_question(params, index)),
            RecordKind::Exam => NormalizedRecord::from(exam_question(params, index)),
        })
        .collect()
}

fn placeholder_options() -> Vec<String> {
    PLACEHOLDER_OPTIONS.iter().map(|o| o.to_string()).collect()
}

/// The correct option rotates with the index so papers are not all "A"
fn placeholder_answer(index: usize) -> String {
    PLACEHOLDER_OPTIONS[index % PLACEHOLDER_OPTIONS.len()].to_string()
}

fn subject(params: &NormalizeParams, index: usize) -> String {
    match params.sub_topic(index) {
        Some(sub_topic) => format!("{} ({})", params.topic, sub_topic),
        None => params.topic.clone(),
    }
}

fn exam_question(params: &NormalizeParams, index: usize) -> ExamQuestion {
    let difficulty = params.difficulty_or_default();
    ExamQuestion {
        id: format!("{}-fallback-{}", params.topic_slug(), index + 1),
        question: format!(
            "[{}] Question {} about {}: which option is correct?",
            difficulty.label(),
            index + 1,
            subject(params, index)
        ),
        options: placeholder_options(),
        answer: Some(placeholder_answer(index)),
        explanation: PLACEHOLDER_EXPLANATION.to_string(),
        difficulty,
        source: RecordOrigin::Fallback,
    }
}

fn quiz_question(params: &NormalizeParams, index: usize) -> QuizQuestion {
    QuizQuestion {
        question: format!(
            "Placeholder question {} about {}",
            index + 1,
            subject(params, index)
        ),
        options: placeholder_options(),
        answer: Some(placeholder_answer(index)),
        source: RecordOrigin::Fallback,
    }
}

fn roadmap_phase(params: &NormalizeParams, index: usize) -> RoadmapPhase {
    let (stage, description) = ROADMAP_STAGES[index % ROADMAP_STAGES.len()];
    let round = index / ROADMAP_STAGES.len();
    let phase = if round == 0 {
        stage.to_string()
    } else {
        format!("{} {}", stage, round + 1)
    };

    RoadmapPhase {
        phase,
        description: format!("{} in {}", description, params.topic),
        duration: ROADMAP_DURATION.to_string(),
        skills: vec![params
            .sub_topic(index)
            .unwrap_or(params.topic.as_str())
            .to_string()],
        resources: vec![format!("Official {} documentation", params.topic)],
        source: RecordOrigin::Fallback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pathwise_domain::Difficulty;

    #[test]
    fn test_exact_count_for_every_kind() {
        let params = NormalizeParams::new("Rust", 7);
        for kind in [RecordKind::Roadmap, RecordKind::Quiz, RecordKind::Exam] {
            let records = fallback_records(kind, &params);
            assert_eq!(records.len(), 7);
            assert!(records.iter().all(|r| r.kind() == kind));
            assert!(records.iter().all(|r| r.source() == RecordOrigin::Fallback));
            assert!(records.iter().all(|r| r.validate().is_ok()));
        }
    }

    #[test]
    fn test_deterministic() {
        let params = NormalizeParams::new("Rust", 3).with_sub_topics("traits, lifetimes");
        assert_eq!(
            fallback_records(RecordKind::Exam, &params),
            fallback_records(RecordKind::Exam, &params)
        );
    }

    #[test]
    fn test_exam_placeholder_content() {
        let params = NormalizeParams::new("Machine Learning", 2)
            .with_difficulty(Difficulty::Hard)
            .with_sub_topics("regression");
        let records = fallback_records(RecordKind::Exam, &params);

        match &records[1] {
            NormalizedRecord::Exam(q) => {
                assert_eq!(q.id, "machine-learning-fallback-2");
                assert!(q.question.contains("[Hard]"));
                assert!(q.question.contains("Question 2"));
                assert!(q.question.contains("Machine Learning (regression)"));
                assert_eq!(q.options, placeholder_options());
                assert_eq!(q.answer.as_deref(), Some("Option B"));
                assert_eq!(q.difficulty, Difficulty::Hard);
            }
            other => panic!("unexpected record {:?}", other),
        }
    }

    #[test]
    fn test_unique_ids() {
        let params = NormalizeParams::new("Rust", 10);
        let records = fallback_records(RecordKind::Exam, &params);
        let mut ids: Vec<_> = records
            .iter()
            .map(|r| match r {
                NormalizedRecord::Exam(q) => q.id.clone(),
                _ => unreachable!(),
            })
            .collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_range_continues_numbering() {
        let params = NormalizeParams::new("Rust", 4);
        let tail = fallback_range(RecordKind::Quiz, &params, 2..4);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].headline(), "Placeholder question 3 about Rust");
    }

    #[test]
    fn test_roadmap_stages_cycle() {
        let params = NormalizeParams::new("Go", 8);
        let records = fallback_records(RecordKind::Roadmap, &params);
        assert_eq!(records[0].headline(), "Foundations");
        assert_eq!(records[6].headline(), "Foundations 2");
        assert_eq!(records[7].headline(), "Core Concepts 2");
    }
}
