mod common;

use common::{closed_port_url, read, remote, spawn, FakeManagement, TestClient};
use escola_services::api::ActivitiesState;
use escola_services::{activities_router, Activity, Score};
use escola_services::store::EntityStore;
use serde_json::{json, Value};

async fn activities_service(management_url: &str) -> (TestClient, ActivitiesState) {
    let state = ActivitiesState::in_memory(&remote(&format!("{}/api", management_url)));
    let url = spawn(activities_router(state.clone())).await;
    (TestClient::new(url), state)
}

#[tokio::test]
async fn test_create_activity_with_confirmed_references() {
    let management = FakeManagement::start(&["/api/professores/2", "/api/turmas/1"], &[]).await;
    let (client, _) = activities_service(&management.url).await;

    let (status, body) = read(
        client
            .post("/api/atividades", json!({"titulo": "T1", "professor_id": 2, "turma_id": 1}))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(status, 201);
    assert_eq!(
        body,
        json!({"id": 1, "titulo": "T1", "descricao": null, "nota": null, "professor_id": 2, "turma_id": 1})
    );
    assert_eq!(management.hits(), vec!["/api/professores/2", "/api/turmas/1"]);

    let (status, fetched) = read(client.get("/api/atividades/1").await.unwrap()).await;
    assert_eq!(status, 200);
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn test_rejected_professor_stops_before_class_group() {
    let management = FakeManagement::start(&["/api/turmas/1"], &[]).await;
    let (client, state) = activities_service(&management.url).await;

    let (status, body) = read(
        client
            .post("/api/atividades", json!({"titulo": "T1", "professor_id": 9, "turma_id": 1}))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["erro"], "Professor 9 não encontrado.");
    assert_eq!(management.hits(), vec!["/api/professores/9"]);
    assert!(state.activities.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_owner_error_status_counts_as_rejection() {
    let management = FakeManagement::start(&["/api/professores/3"], &["/api/turmas/4"]).await;
    let (client, _) = activities_service(&management.url).await;

    let (status, body) = read(
        client
            .post("/api/atividades", json!({"titulo": "T1", "professor_id": 3, "turma_id": 4}))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["erro"], "Turma 4 não encontrada.");
}

#[tokio::test]
async fn test_management_down_is_a_server_error() {
    let (client, state) = activities_service(&closed_port_url().await).await;

    let (status, body) = read(
        client
            .post("/api/atividades", json!({"titulo": "T1", "professor_id": 2, "turma_id": 1}))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(status, 500);
    assert_eq!(
        body["erro"],
        "Falha ao conectar ao serviço de gerenciamento (professores)."
    );
    assert!(state.activities.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_fields_never_reach_management() {
    let management = FakeManagement::start(&[], &[]).await;
    let (client, _) = activities_service(&management.url).await;

    let (status, body) = read(client.post("/api/notas", json!({"valor": 9.0})).await.unwrap()).await;

    assert_eq!(status, 400);
    assert_eq!(body["erro"], "Campos obrigatórios: valor, aluno_id, atividade_id");
    assert!(management.hits().is_empty());
}

#[tokio::test]
async fn test_score_for_unknown_activity() {
    let management = FakeManagement::start(&["/api/alunos/1"], &[]).await;
    let (client, state) = activities_service(&management.url).await;

    let (status, body) = read(
        client
            .post("/api/notas", json!({"valor": 9.5, "aluno_id": 1, "atividade_id": 99}))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["erro"], "Atividade 99 não encontrada.");
    assert!(state.scores.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_every_write_revalidates() {
    let management = FakeManagement::start(&["/api/professores/2", "/api/turmas/1"], &[]).await;
    let (client, _) = activities_service(&management.url).await;
    let payload = json!({"titulo": "T1", "professor_id": 2, "turma_id": 1});

    let (first, _) = read(client.post("/api/atividades", payload.clone()).await.unwrap()).await;
    let (second, body) = read(client.post("/api/atividades/", payload).await.unwrap()).await;

    assert_eq!((first, second), (201, 201));
    assert_eq!(body["id"], 2);
    assert_eq!(management.hits().len(), 4);
}

#[tokio::test]
async fn test_partial_update_and_failed_update() {
    let management = FakeManagement::start(&["/api/professores/2", "/api/turmas/1"], &[]).await;
    let (client, _) = activities_service(&management.url).await;

    client
        .post(
            "/api/atividades",
            json!({"titulo": "T1", "descricao": "Capítulo 3", "professor_id": 2, "turma_id": 1}),
        )
        .await
        .unwrap();

    let (status, updated) = read(client.put("/api/atividades/1", json!({"nota": 7.0})).await.unwrap()).await;
    assert_eq!(status, 200);
    assert_eq!(updated["nota"], 7.0);
    assert_eq!(updated["titulo"], "T1");
    assert_eq!(updated["descricao"], "Capítulo 3");

    let (status, body) = read(
        client
            .put("/api/atividades/1", json!({"titulo": "T2", "professor_id": 5}))
            .await
            .unwrap(),
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["erro"], "Professor 5 não encontrado.");

    let (_, current) = read(client.get("/api/atividades/1").await.unwrap()).await;
    assert_eq!(current["titulo"], "T1");
    assert_eq!(current["professor_id"], 2);
}

#[tokio::test]
async fn test_update_of_missing_record_skips_validation() {
    let management = FakeManagement::start(&[], &[]).await;
    let (client, _) = activities_service(&management.url).await;

    let (status, body) = read(
        client
            .put("/api/notas/42", json!({"aluno_id": 3}))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(status, 404);
    assert_eq!(body["erro"], "Nota não encontrada");
    assert!(management.hits().is_empty());
}

#[tokio::test]
async fn test_deleted_ids_are_not_reused() {
    let management = FakeManagement::start(&["/api/professores/2", "/api/turmas/1"], &[]).await;
    let (client, _) = activities_service(&management.url).await;
    let payload = json!({"titulo": "T1", "professor_id": 2, "turma_id": 1});

    client.post("/api/atividades", payload.clone()).await.unwrap();

    let (status, body) = read(client.delete("/api/atividades/1").await.unwrap()).await;
    assert_eq!(status, 200);
    assert_eq!(body["mensagem"], "Atividade 1 removida com sucesso");

    let (status, _) = read(client.get("/api/atividades/1").await.unwrap()).await;
    assert_eq!(status, 404);
    let (status, _) = read(client.delete("/api/atividades/1").await.unwrap()).await;
    assert_eq!(status, 404);

    let (_, recreated) = read(client.post("/api/atividades", payload).await.unwrap()).await;
    assert_eq!(recreated["id"], 2);

    let (_, list) = read(client.get("/api/atividades").await.unwrap()).await;
    let ids: Vec<Value> = list
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["id"].clone())
        .collect();
    assert_eq!(ids, vec![json!(2)]);
}

#[tokio::test]
async fn test_seed_links_scores_to_seeded_activities() {
    let (client, _) = activities_service(&closed_port_url().await).await;

    let (status, body) = read(client.post_empty("/api/seed").await.unwrap()).await;

    assert_eq!(status, 201);
    assert_eq!(body["message"], "Banco de atividades e notas populado!");
    assert_eq!(body["atividades"][0]["titulo"], "Prova de Matemática");
    assert_eq!(body["notas"][2]["atividade_id"], body["atividades"][1]["id"]);
}

#[tokio::test]
async fn test_update_with_management_down_keeps_the_record() {
    let (client, state) = activities_service(&closed_port_url().await).await;
    state.activities.create(Activity::new("T1", 2, 1)).await.unwrap();

    let (status, body) = read(
        client
            .put("/api/atividades/1", json!({"titulo": "T2", "turma_id": 3}))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(status, 500);
    assert_eq!(body["erro"], "Falha ao conectar ao serviço de gerenciamento (turmas).");

    let stored = state.activities.get(1).await.unwrap().unwrap();
    assert_eq!(stored.data, Activity::new("T1", 2, 1));
}

#[tokio::test]
async fn test_score_update_with_unknown_activity() {
    let management = FakeManagement::start(&[], &[]).await;
    let (client, state) = activities_service(&management.url).await;
    let activity = state.activities.create(Activity::new("T1", 2, 1)).await.unwrap();
    state.scores.create(Score::new(8.0, 3, activity.id)).await.unwrap();

    let (status, body) = read(
        client
            .put("/api/notas/1", json!({"valor": 10.0, "atividade_id": 99}))
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(status, 400);
    assert_eq!(body["erro"], "Atividade 99 não encontrada.");
    assert!(management.hits().is_empty());

    let stored = state.scores.get(1).await.unwrap().unwrap();
    assert_eq!(stored.data, Score::new(8.0, 3, activity.id));
}

#[tokio::test]
async fn test_score_create_with_management_down_names_students() {
    let (client, state) = activities_service(&closed_port_url().await).await;
    let activity = state.activities.create(Activity::new("T1", 2, 1)).await.unwrap();

    let (status, body) = read(
        client
            .post(
                "/api/notas",
                json!({"valor": 8.5, "aluno_id": 3, "atividade_id": activity.id}),
            )
            .await
            .unwrap(),
    )
    .await;

    assert_eq!(status, 500);
    assert_eq!(body["erro"], "Falha ao conectar ao serviço de gerenciamento (alunos).");
    assert!(state.scores.list().await.unwrap().is_empty());
}
