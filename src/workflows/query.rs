use crate::api::{self, QueryRequest};
use crate::config::ApiConfig;
use crate::models::{document_ref, QueryResult};
use log::debug;

pub const NO_ANSWER_PLACEHOLDER: &str = "No answer provided";

/// Maintains the editable question list and the result history, and drives
/// batched query submission against the selected documents.
#[derive(Debug)]
pub struct QueryWorkflow {
    config: ApiConfig,
    questions: Vec<String>,
    results: Vec<QueryResult>,
    loading: bool,
    error: Option<String>,
}

impl QueryWorkflow {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            questions: vec![String::new()],
            results: Vec::new(),
            loading: false,
            error: None,
        }
    }

    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    /// Result history, most recent submission first; within a submission,
    /// results follow the original question order.
    pub fn results(&self) -> &[QueryResult] {
        &self.results
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn add_question(&mut self) {
        self.questions.push(String::new());
    }

    /// `index` must be a valid position in the question list.
    pub fn update_question(&mut self, index: usize, text: impl Into<String>) {
        self.questions[index] = text.into();
    }

    /// Removes the entry at `index`, unless it is the last one — the list
    /// never becomes empty through user removal.
    pub fn remove_question(&mut self, index: usize) {
        if self.questions.len() > 1 {
            self.questions.remove(index);
        }
    }

    /// Validates and shapes the request without sending it. Blank questions
    /// are dropped and the rest trimmed; selection order is preserved.
    pub fn build_request(&self, selection: &[i64]) -> Result<QueryRequest, String> {
        if selection.is_empty() {
            return Err("no context selected".to_string());
        }
        let questions: Vec<String> = self
            .questions
            .iter()
            .map(|q| q.trim().to_string())
            .filter(|q| !q.is_empty())
            .collect();
        if questions.is_empty() {
            return Err("no question provided".to_string());
        }
        Ok(QueryRequest {
            documents: selection.iter().map(|id| document_ref(*id)).collect(),
            questions,
        })
    }

    /// Pairs each submitted question with its positional answer; a short
    /// answer list fills the tail with the placeholder instead of failing
    /// the whole batch.
    fn merge_answers(questions: &[String], answers: Vec<String>) -> Vec<QueryResult> {
        let mut answers = answers.into_iter();
        questions
            .iter()
            .map(|question| {
                let answer = answers
                    .next()
                    .filter(|a| !a.is_empty())
                    .unwrap_or_else(|| NO_ANSWER_PLACEHOLDER.to_string());
                QueryResult::new(question.clone(), answer)
            })
            .collect()
    }

    /// Submit the current questions against `selection` as one batched call.
    ///
    /// Returns the number of results produced. On any failure the question
    /// list, the caller's selection, and the history are left exactly as they
    /// were. Only one submission may be in flight at a time.
    pub async fn submit(&mut self, selection: &[i64]) -> Result<usize, String> {
        if self.loading {
            return Err("a query is already in progress".to_string());
        }

        // 1. Validate and shape the request before any call is made.
        let request = match self.build_request(selection) {
            Ok(request) => request,
            Err(e) => {
                self.error = Some(e.clone());
                return Err(e);
            }
        };

        // 2. One batched call for all questions.
        self.loading = true;
        self.error = None;
        debug!(
            "submitting {} questions over {} documents",
            request.questions.len(),
            request.documents.len()
        );
        let result = api::run_query(&self.config, &request).await;
        self.loading = false;

        match result {
            Ok(response) => {
                // 3. Map answers positionally and prepend the batch.
                let batch = Self::merge_answers(&request.questions, response.answers);
                let produced = batch.len();
                self.results.splice(0..0, batch);

                // 4. Reset the editor; the selection is the caller's to keep.
                self.questions = vec![String::new()];
                Ok(produced)
            }
            Err(e) => {
                let message = e.to_string();
                self.error = Some(message.clone());
                Err(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workflow() -> QueryWorkflow {
        QueryWorkflow::new(ApiConfig::default())
    }

    #[test]
    fn starts_with_one_empty_question() {
        assert_eq!(workflow().questions(), &[String::new()]);
    }

    #[test]
    fn remove_question_never_empties_the_list() {
        let mut wf = workflow();
        wf.remove_question(0);
        assert_eq!(wf.questions().len(), 1);

        wf.add_question();
        wf.update_question(0, "first");
        wf.update_question(1, "second");
        wf.remove_question(0);
        assert_eq!(wf.questions(), &["second".to_string()]);
        wf.remove_question(0);
        assert_eq!(wf.questions(), &["second".to_string()]);
    }

    #[test]
    fn build_request_requires_selection() {
        let mut wf = workflow();
        wf.update_question(0, "anything");
        assert_eq!(
            wf.build_request(&[]).unwrap_err(),
            "no context selected".to_string()
        );
    }

    #[test]
    fn build_request_requires_a_non_blank_question() {
        let mut wf = workflow();
        wf.add_question();
        wf.update_question(0, "   ");
        assert_eq!(
            wf.build_request(&[1]).unwrap_err(),
            "no question provided".to_string()
        );
    }

    #[test]
    fn build_request_shapes_documents_and_trims_questions() {
        let mut wf = workflow();
        wf.update_question(0, "a");
        wf.add_question();
        wf.add_question();
        wf.update_question(2, "  b  ");
        let request = wf.build_request(&[1, 2]).unwrap();
        assert_eq!(
            request.documents,
            vec!["document-1".to_string(), "document-2".to_string()]
        );
        assert_eq!(request.questions, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn short_answer_list_falls_back_to_placeholder() {
        let questions = vec!["a".to_string(), "b".to_string()];
        let results = QueryWorkflow::merge_answers(&questions, vec!["A1".to_string()]);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].answer, "A1");
        assert_eq!(results[1].answer, NO_ANSWER_PLACEHOLDER);
    }

    #[test]
    fn empty_answer_string_also_gets_placeholder() {
        let questions = vec!["a".to_string()];
        let results = QueryWorkflow::merge_answers(&questions, vec![String::new()]);
        assert_eq!(results[0].answer, NO_ANSWER_PLACEHOLDER);
    }

    #[test]
    fn merged_results_keep_question_order() {
        let questions = vec!["q1".to_string(), "q2".to_string(), "q3".to_string()];
        let answers = vec!["a1".to_string(), "a2".to_string(), "a3".to_string()];
        let results = QueryWorkflow::merge_answers(&questions, answers);
        let got: Vec<&str> = results.iter().map(|r| r.question.as_str()).collect();
        assert_eq!(got, vec!["q1", "q2", "q3"]);
    }
}
