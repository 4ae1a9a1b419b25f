mod common;

use axum::http::{header, StatusCode};
use common::{body_text, location, TestApp};
use orca::models::user::Role;
use orca::test_utils::test_helpers;

async fn signed_in(app: &TestApp) -> common::Client {
    app.user("Ana", "ana@example.com", "pw", Role::Viewer).await;
    let mut client = app.client();
    client.login("ana@example.com", "pw").await;
    client
}

#[tokio::test]
async fn test_create_project_and_ignore_blank_name() {
    let app = TestApp::spawn().await;
    let mut client = signed_in(&app).await;

    let response = client.submit("/", "/obras/add", &[("nome", "Edifício Sol")]).await;
    assert_eq!(location(&response).as_deref(), Some("/"));

    client.submit("/", "/obras/add", &[("nome", "   ")]).await;

    let projects = app.state.project_service.list_projects().await.unwrap();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].name, "Edifício Sol");
    assert!(body_text(client.get("/").await).await.contains("Edifício Sol"));
}

#[tokio::test]
async fn test_add_expense_parses_brazilian_amount() {
    let app = TestApp::spawn().await;
    let project = test_helpers::create_test_project(&app.pool, "Obra A").await.unwrap();
    let mut client = signed_in(&app).await;
    let page = format!("/gastos/{project}");

    let response = client
        .submit(
            &page,
            &format!("/gastos/add/{project}"),
            &[
                ("tipo_nota", "Alimentação"),
                ("valor", "R$ 1.234,56"),
                ("data_nota", "2025-03-10"),
                ("descricao", "Almoço equipe"),
                ("aprovador", "Carlos"),
            ],
        )
        .await;
    assert_eq!(location(&response).as_deref(), Some(page.as_str()));

    let (_, expenses) = app
        .state
        .expense_service
        .project_expenses(project)
        .await
        .unwrap();
    assert_eq!(expenses.len(), 1);
    assert_eq!(expenses[0].amount, 1234.56);
    assert_eq!(expenses[0].approver, "Carlos");

    let html = body_text(client.get(&page).await).await;
    assert!(html.contains("R$ 1234.56"));
    assert!(html.contains("Almoço equipe"));
}

#[tokio::test]
async fn test_invalid_input_flashes_and_stores_nothing() {
    let app = TestApp::spawn().await;
    let project = test_helpers::create_test_project(&app.pool, "Obra A").await.unwrap();
    let mut client = signed_in(&app).await;
    let page = format!("/gastos/{project}");
    let action = format!("/gastos/add/{project}");

    client
        .submit(
            &page,
            &action,
            &[
                ("tipo_nota", "VR"),
                ("valor", "50,00"),
                ("data_nota", "10/03/2025"),
                ("aprovador", "Carlos"),
            ],
        )
        .await;
    assert!(body_text(client.get(&page).await).await.contains("Data inválida"));

    client
        .submit(
            &page,
            &action,
            &[
                ("tipo_nota", "VR"),
                ("valor", "cinquenta"),
                ("data_nota", "2025-03-10"),
                ("aprovador", "Carlos"),
            ],
        )
        .await;
    assert!(body_text(client.get(&page).await).await.contains("Valor inválido."));

    assert_eq!(
        test_helpers::count_rows(&app.pool, "expenses").await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_delete_only_expense_leaves_empty_list() {
    let app = TestApp::spawn().await;
    let project = test_helpers::create_test_project(&app.pool, "Obra A").await.unwrap();
    let expense = test_helpers::create_test_expense(&app.pool, project, "VR", 80.0)
        .await
        .unwrap();
    let mut client = signed_in(&app).await;
    let page = format!("/gastos/{project}");

    let response = client
        .submit(&page, &format!("/gastos/delete/{project}/{expense}"), &[])
        .await;
    assert_eq!(location(&response).as_deref(), Some(page.as_str()));

    let html = body_text(client.get(&page).await).await;
    assert!(html.contains("Gasto removido."));
    assert!(html.contains("Nenhum gasto registrado."));
}

#[tokio::test]
async fn test_second_delete_of_same_expense_is_not_found() {
    let app = TestApp::spawn().await;
    let project = test_helpers::create_test_project(&app.pool, "Obra A").await.unwrap();
    let expense = test_helpers::create_test_expense(&app.pool, project, "Material", 150.0)
        .await
        .unwrap();
    let mut client = signed_in(&app).await;
    let page = format!("/gastos/{project}");
    let action = format!("/gastos/delete/{project}/{expense}");

    let first = client.submit(&page, &action, &[]).await;
    assert_eq!(first.status(), StatusCode::SEE_OTHER);

    let second = client.submit(&page, &action, &[]).await;
    assert_eq!(second.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        test_helpers::count_rows(&app.pool, "expenses").await.unwrap(),
        0
    );
}

#[tokio::test]
async fn test_delete_is_scoped_to_project() {
    let app = TestApp::spawn().await;
    let first = test_helpers::create_test_project(&app.pool, "Obra A").await.unwrap();
    let second = test_helpers::create_test_project(&app.pool, "Obra B").await.unwrap();
    let expense = test_helpers::create_test_expense(&app.pool, first, "VR", 80.0)
        .await
        .unwrap();
    let mut client = signed_in(&app).await;

    let response = client
        .submit(
            &format!("/gastos/{second}"),
            &format!("/gastos/delete/{second}/{expense}"),
            &[],
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        test_helpers::count_rows(&app.pool, "expenses").await.unwrap(),
        1
    );
}

#[tokio::test]
async fn test_unknown_project_is_not_found() {
    let app = TestApp::spawn().await;
    let mut client = signed_in(&app).await;

    assert_eq!(client.get("/gastos/999").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        client.get("/export/excel/999").await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        client.get("/export/pdf/999").await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_category_totals_endpoint() {
    let app = TestApp::spawn().await;
    let a = test_helpers::create_test_project(&app.pool, "Obra A").await.unwrap();
    let b = test_helpers::create_test_project(&app.pool, "Obra B").await.unwrap();
    test_helpers::create_test_expense(&app.pool, a, "VR", 100.0).await.unwrap();
    test_helpers::create_test_expense(&app.pool, b, "VR", 50.5).await.unwrap();
    test_helpers::create_test_expense(&app.pool, a, "Aluguel de imoveis", 900.0)
        .await
        .unwrap();
    // Not one of the fixed categories
    test_helpers::create_test_expense(&app.pool, a, "Diversos", 7.0).await.unwrap();
    let mut client = signed_in(&app).await;

    let response = client.get("/api/gastos_tipos").await;
    assert_eq!(response.status(), StatusCode::OK);
    let totals: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();

    let labels = totals["labels"].as_array().unwrap();
    let data: Vec<f64> = totals["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_f64().unwrap())
        .collect();
    assert_eq!(labels.len(), 10);
    assert_eq!(data.len(), 10);

    let vr = labels.iter().position(|l| l == "VR").unwrap();
    assert_eq!(data[vr], 150.5);
    assert_eq!(data.iter().sum::<f64>(), 1050.5);

    let food = labels.iter().position(|l| l == "Alimentação").unwrap();
    assert_eq!(data[food], 0.0);
}

#[tokio::test]
async fn test_exports_are_downloads() {
    let app = TestApp::spawn().await;
    let project = test_helpers::create_test_project(&app.pool, "Obra A").await.unwrap();
    test_helpers::create_test_expense(&app.pool, project, "VR", 80.0)
        .await
        .unwrap();
    let mut client = signed_in(&app).await;

    let response = client.get(&format!("/export/excel/{project}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let disposition = response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .to_string();
    assert!(disposition.contains(&format!("gastos_obra_{project}.xlsx")));
    assert!(body_text(response).await.starts_with("PK"));

    let response = client.get(&format!("/export/pdf/{project}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert!(body_text(response).await.starts_with("%PDF"));
}
