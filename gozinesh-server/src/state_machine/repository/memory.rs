//! In-memory implementation of [`QuestionRepository`].
//!
//! All state is held in memory and lost on restart. Used by the test
//! suite and as the default wiring when no durable backend is attached.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use tokio::sync::RwLock;

use gozinesh_core::{
    ArchiveFilter, ArchivedUser, InterviewCategory, InterviewQuestion, NewArchivedSubmission,
    NewQuizQuestion, PoliticalTopic, QuestionId, QuizQuestion, SubmissionKind, TestType, UserId,
};

use super::{QuestionRepository, RepositoryError};

struct ArchiveRow {
    user: UserId,
    user_name: String,
    kind: SubmissionKind,
    full_text: String,
}

/// In-memory repository backed by `RwLock`-protected tables.
pub struct InMemoryRepository {
    interview_questions: RwLock<Vec<InterviewQuestion>>,
    quiz_questions: RwLock<Vec<QuizQuestion>>,
    /// Append-only; newest rows are at the end.
    archive: RwLock<Vec<ArchiveRow>>,
    cooldowns: RwLock<HashMap<(UserId, TestType), u64>>,
    next_id: AtomicI64,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self {
            interview_questions: RwLock::new(Vec::new()),
            quiz_questions: RwLock::new(Vec::new()),
            archive: RwLock::new(Vec::new()),
            cooldowns: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn allocate_id(&self) -> QuestionId {
        QuestionId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn now_secs() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

impl Default for InMemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuestionRepository for InMemoryRepository {
    async fn list_interview_questions(
        &self,
        category: InterviewCategory,
        topic: Option<PoliticalTopic>,
    ) -> Result<Vec<InterviewQuestion>, RepositoryError> {
        let questions = self.interview_questions.read().await;
        Ok(questions
            .iter()
            .filter(|q| q.category == category && q.topic == topic)
            .cloned()
            .collect())
    }

    async fn insert_interview_question(
        &self,
        category: InterviewCategory,
        topic: Option<PoliticalTopic>,
        text: &str,
    ) -> Result<(), RepositoryError> {
        let mut questions = self.interview_questions.write().await;
        if questions.iter().any(|q| q.text == text) {
            return Ok(());
        }
        questions.push(InterviewQuestion {
            id: self.allocate_id(),
            category,
            topic,
            text: text.to_string(),
        });
        Ok(())
    }

    async fn delete_interview_question(&self, id: QuestionId) -> Result<(), RepositoryError> {
        let mut questions = self.interview_questions.write().await;
        questions.retain(|q| q.id != id);
        Ok(())
    }

    async fn list_quiz_questions(
        &self,
        test_type: TestType,
    ) -> Result<Vec<QuizQuestion>, RepositoryError> {
        let questions = self.quiz_questions.read().await;
        Ok(questions
            .iter()
            .filter(|q| q.test_type == test_type)
            .cloned()
            .collect())
    }

    async fn insert_quiz_question(
        &self,
        question: NewQuizQuestion,
    ) -> Result<(), RepositoryError> {
        let mut questions = self.quiz_questions.write().await;
        if questions
            .iter()
            .any(|q| q.test_type == question.test_type && q.text == question.text)
        {
            return Ok(());
        }
        questions.push(QuizQuestion {
            id: self.allocate_id(),
            test_type: question.test_type,
            text: question.text,
            options: question.options,
            correct: question.correct,
        });
        Ok(())
    }

    async fn append_submission(
        &self,
        submission: NewArchivedSubmission,
    ) -> Result<(), RepositoryError> {
        let mut archive = self.archive.write().await;
        archive.push(ArchiveRow {
            user: submission.user,
            user_name: submission.user_name,
            kind: submission.kind,
            full_text: submission.full_text,
        });
        Ok(())
    }

    async fn list_archived_users(&self) -> Result<Vec<ArchivedUser>, RepositoryError> {
        let archive = self.archive.read().await;
        let mut users: Vec<ArchivedUser> = Vec::new();
        for row in archive.iter() {
            if !users.iter().any(|u| u.id == row.user) {
                users.push(ArchivedUser {
                    id: row.user,
                    name: row.user_name.clone(),
                });
            }
        }
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn list_submissions(
        &self,
        user: UserId,
        filter: ArchiveFilter,
    ) -> Result<Vec<String>, RepositoryError> {
        let archive = self.archive.read().await;
        Ok(archive
            .iter()
            .rev()
            .filter(|row| row.user == user && filter.matches(row.kind))
            .map(|row| row.full_text.clone())
            .collect())
    }

    async fn attempt_cooldown(
        &self,
        user: UserId,
        test_type: TestType,
    ) -> Result<Option<u64>, RepositoryError> {
        let cooldowns = self.cooldowns.read().await;
        Ok(cooldowns.get(&(user, test_type)).copied())
    }

    async fn upsert_attempt_cooldown(
        &self,
        user: UserId,
        test_type: TestType,
    ) -> Result<(), RepositoryError> {
        let mut cooldowns = self.cooldowns.write().await;
        cooldowns.insert((user, test_type), Self::now_secs());
        Ok(())
    }

    async fn clear_attempt_cooldown(
        &self,
        user: UserId,
        test_type: TestType,
    ) -> Result<(), RepositoryError> {
        let mut cooldowns = self.cooldowns.write().await;
        cooldowns.remove(&(user, test_type));
        Ok(())
    }
}
