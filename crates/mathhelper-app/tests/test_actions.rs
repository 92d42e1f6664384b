use std::sync::Arc;

use mathhelper_app::{ActionError, EquationList, Notice, SolutionOutcome};
use mathhelper_common::Equation;
use mathhelper_test_utils::{quadratic, seeded_gateway, Call, MockGateway};
use pretty_assertions::assert_eq;
use tokio_test::{assert_err, assert_ok};

fn held(list: &[Equation], id: i64) -> Option<Equation> {
    list.iter().find(|e| e.id == id).cloned()
}

async fn loaded() -> (Arc<MockGateway>, Arc<EquationList>) {
    let gateway = Arc::new(seeded_gateway());
    let list = Arc::new(EquationList::new(gateway.clone()));
    list.activate().await;
    (gateway, list)
}

async fn wait_for_call(gateway: &MockGateway, matches: impl Fn(&Call) -> bool) {
    while !gateway.calls().iter().any(&matches) {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_create_prepends_canonical_record() {
    let (gateway, list) = loaded().await;
    let mut notices = list.subscribe();

    let created = assert_ok!(list.create("x^2-4=0").await);
    assert_eq!(created, Equation::new(100, "x^2-4=0"));

    let equations = list.equations().await;
    assert_eq!(equations[0], created);
    assert_eq!(equations.len(), 4);
    assert!(gateway.calls().contains(&Call::FetchByLocation("equations/100".into())));
    assert_eq!(
        notices.recv().await.unwrap(),
        Notice::Created { id: 100, equation: "x^2-4=0".into() }
    );
}

#[tokio::test]
async fn test_rejected_create_reports_cleaned_message() {
    let (gateway, list) = loaded().await;
    let mut notices = list.subscribe();

    let err = assert_err!(list.create("x+1").await);
    match &err {
        ActionError::CreateRejected { message } => {
            assert_eq!(message, "Equation must contain '='");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(err.to_string(), "Equation must contain '='");
    assert_eq!(list.equations().await.len(), 3);
    assert!(!gateway.calls().iter().any(|c| matches!(c, Call::FetchByLocation(_))));
    assert_eq!(
        notices.recv().await.unwrap(),
        Notice::CreateRejected { message: "Equation must contain '='".into() }
    );
}

#[tokio::test]
async fn test_server_side_validation_text_is_cleaned() {
    let gateway = Arc::new(seeded_gateway().reject_create_with(r#"["unbalanced \"(\""]"#));
    let list = EquationList::new(gateway);
    list.activate().await;

    let err = list.create("(x=1").await.unwrap_err();
    assert_eq!(err.to_string(), "Unbalanced (");
}

#[tokio::test]
async fn test_create_before_activation_is_in_first_load() {
    let gateway = Arc::new(seeded_gateway());
    let list = EquationList::new(gateway);

    list.create("x=7").await.unwrap();
    assert!(list.equations().await.is_empty());

    // the server order, nothing replayed on top
    let state = list.activate().await;
    let ids: Vec<_> = state.equations().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 100]);
}

#[tokio::test]
async fn test_delete_removes_only_after_server_agrees() {
    let (gateway, list) = loaded().await;

    assert_ok!(list.delete(2).await);
    assert!(held(&list.equations().await, 2).is_none());
    assert!(gateway.server_equations().iter().all(|e| e.id != 2));

    let err = assert_err!(list.delete(2).await);
    assert!(matches!(err, ActionError::DeleteRejected { id: 2, .. }));
    assert_eq!(list.equations().await.len(), 2);
}

#[tokio::test]
async fn test_delete_of_record_not_held_leaves_list_unchanged() {
    let gateway = Arc::new(seeded_gateway());
    let list = EquationList::new(gateway.clone());
    list.activate().await;

    // created through another list, so this one never held it
    let other = EquationList::new(gateway.clone());
    let created = assert_ok!(other.create("z=2").await);

    let before = list.equations().await;
    assert_ok!(list.delete(created.id).await);
    assert_eq!(list.equations().await, before);
    assert!(gateway.server_equations().iter().all(|e| e.id != created.id));
}

#[tokio::test]
async fn test_delete_rejection_text_is_passed_through() {
    let (_gateway, list) = loaded().await;

    let err = assert_err!(list.delete(42).await);
    match err {
        ActionError::DeleteRejected { id, message } => {
            assert_eq!(id, 42);
            assert_eq!(message, "Equation not found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_accepted_solution_is_appended_last() {
    let (gateway, list) = loaded().await;
    let mut notices = list.subscribe();

    let outcome = list.add_solution(1, -1.0).await.unwrap();
    assert_eq!(outcome, SolutionOutcome::Appended);

    let eq = held(&list.equations().await, 1).unwrap();
    assert_eq!(eq.solutions, vec![1.0, -1.0]);
    assert_eq!(eq.equation_string, quadratic().equation_string);
    assert!(!list.is_solution_input_open(1).await);
    assert_eq!(gateway.calls().last(), Some(&Call::TryAddSolution(1, -1.0)));
    assert_eq!(notices.recv().await.unwrap(), Notice::SolutionAdded { id: 1, value: -1.0 });
}

#[tokio::test]
async fn test_rejected_solution_leaves_record_and_input() {
    let (_gateway, list) = loaded().await;

    let err = assert_err!(list.add_solution(1, 5.0).await);
    assert_eq!(err.to_string(), "Invalid root 5 for equation 1");

    assert_eq!(held(&list.equations().await, 1).unwrap().solutions, vec![1.0]);
    assert!(list.is_solution_input_open(1).await);
}

#[tokio::test]
async fn test_solution_for_deleted_record_is_discarded() {
    let (gateway, list) = loaded().await;
    let gate = gateway.hold_add_solution();

    let proposing = tokio::spawn({
        let list = list.clone();
        async move { list.add_solution(1, -1.0).await }
    });
    wait_for_call(&gateway, |c| matches!(c, Call::TryAddSolution(1, _))).await;

    list.delete(1).await.unwrap();
    gate.notify_one();

    assert_eq!(proposing.await.unwrap().unwrap(), SolutionOutcome::Discarded);
    assert!(held(&list.equations().await, 1).is_none());
    assert!(!list.is_solution_input_open(1).await);
}

#[tokio::test]
async fn test_solution_without_collection_is_discarded() {
    let gateway = Arc::new(seeded_gateway().fail_list_times(1));
    let list = EquationList::new(gateway.clone());
    assert!(!list.activate().await.is_loaded());
    let mut notices = list.subscribe();

    let outcome = assert_ok!(list.add_solution(1, -1.0).await);
    assert_eq!(outcome, SolutionOutcome::Discarded);
    assert!(list.equations().await.is_empty());
    assert!(notices.try_recv().is_err());

    // the server kept it; a retry shows it
    let state = list.reload().await;
    let eq = state.equations().iter().find(|e| e.id == 1).cloned().unwrap();
    assert_eq!(eq.solutions, vec![1.0, -1.0]);
}

#[tokio::test]
async fn test_late_answer_does_not_close_reopened_input() {
    let (gateway, list) = loaded().await;
    let gate = gateway.hold_add_solution();

    let first = list.open_solution_input(3).await;
    let proposing = tokio::spawn({
        let list = list.clone();
        async move { list.submit_solution(first, 0.5).await }
    });
    wait_for_call(&gateway, |c| matches!(c, Call::TryAddSolution(3, _))).await;

    list.close_solution_input(3).await;
    let second = list.open_solution_input(3).await;
    assert_ne!(first, second);

    gate.notify_one();
    assert_eq!(proposing.await.unwrap().unwrap(), SolutionOutcome::Appended);
    assert!(list.is_solution_input_open(3).await);
    assert_eq!(held(&list.equations().await, 3).unwrap().solutions, vec![0.5]);
}

#[tokio::test]
async fn test_independent_actions_complete_in_any_order() {
    let (gateway, list) = loaded().await;
    let gate = gateway.hold_add_solution();

    let proposing = tokio::spawn({
        let list = list.clone();
        async move { list.add_solution(1, -1.0).await }
    });
    wait_for_call(&gateway, |c| matches!(c, Call::TryAddSolution(1, _))).await;

    // not blocked by the pending proposal
    list.create("y=1").await.unwrap();
    list.delete(3).await.unwrap();

    gate.notify_one();
    proposing.await.unwrap().unwrap();

    let equations = list.equations().await;
    let ids: Vec<_> = equations.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![100, 1, 2]);
    assert_eq!(held(&equations, 1).unwrap().solutions, vec![1.0, -1.0]);
}
