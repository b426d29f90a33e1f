use chrono::NaiveDate;
use hidroweb::{
    AuthError, ClientConfig, Credentials, ErrorCategory, Hidroweb, HidrowebError, MonthlySeries,
    SeriesLazyFrame, StaticCredentials, TransportError,
};
use httpmock::prelude::*;
use serde_json::{json, Value};

fn client(server: &MockServer) -> Hidroweb {
    let config = ClientConfig::builder().base_url(server.base_url()).build();
    Hidroweb::with_config(
        StaticCredentials(Credentials::new("login", "password")),
        config,
    )
}

fn rainfall_row(reference: &str) -> Value {
    json!({
        "codigoestacao": "2243004",
        "Data_Hora_Dado": reference,
        "Data_Ultima_Alteracao": "2023-01-10 08:00:00.0",
        "Dia_Maxima": "1",
        "Maxima": "12.5",
        "Maxima_Status": "1",
        "Nivel_Consistencia": "1",
        "Total": "20.0",
        "Chuva_01": "12.5",
        "Chuva_01_Status": "1",
        "Chuva_02": "7.5",
        "Chuva_02_Status": "1"
    })
}

#[tokio::test]
async fn test_rainfall_through_http() -> Result<(), HidrowebError> {
    let server = MockServer::start_async().await;
    let identity = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/OAUth/v1")
                .header("Identificador", "login")
                .header("Senha", "password");
            then.status(200).json_body(json!({
                "status": "OK",
                "code": 200,
                "message": "Sucesso",
                "items": {"tokenautenticacao": "abc123"}
            }));
        })
        .await;
    let series = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/HidroSerieChuva/v1")
                .header("Authorization", "Bearer abc123")
                .query_param("Código da Estação", "2243004")
                .query_param("Tipo Filtro Data", "DATA_LEITURA")
                .query_param("Data Inicial (yyyy-MM-dd)", "2022-01-01")
                .query_param("Data Final (yyyy-MM-dd)", "2022-12-31");
            then.status(200).json_body(json!({
                "status": "OK",
                "code": 200,
                "message": "Sucesso",
                "items": [rainfall_row("2022-03-01 00:00:00.0")]
            }));
        })
        .await;

    let client = client(&server);
    let months = client
        .series()
        .rainfall(2243004)
        .start(NaiveDate::from_ymd_opt(2022, 3, 1).unwrap())
        .end(NaiveDate::from_ymd_opt(2022, 3, 31).unwrap())
        .call()
        .await?;
    // The token is reused for the second call.
    client
        .series()
        .rainfall(2243004)
        .start(NaiveDate::from_ymd_opt(2022, 6, 1).unwrap())
        .end(NaiveDate::from_ymd_opt(2022, 6, 30).unwrap())
        .call()
        .await?;

    identity.assert_async().await;
    series.assert_hits_async(2).await;

    assert_eq!(months.len(), 1);
    assert_eq!(months[0].month(), NaiveDate::from_ymd_opt(2022, 3, 1).unwrap());
    assert_eq!(months[0].total, Some(20.0));

    let frame = SeriesLazyFrame::from_rows(&months)?
        .with_values()
        .frame
        .collect()?;
    assert_eq!(frame.height(), 2);
    Ok(())
}

#[tokio::test]
async fn test_rejected_credentials() {
    let server = MockServer::start_async().await;
    let identity = server
        .mock_async(|when, then| {
            when.method(GET).path("/OAUth/v1");
            then.status(401);
        })
        .await;

    let err = client(&server)
        .inventory()
        .station(2243004)
        .await
        .unwrap_err();

    identity.assert_async().await;
    assert!(matches!(
        err,
        HidrowebError::Auth(AuthError::AuthenticationFailed { .. })
    ));
}

#[tokio::test]
async fn test_server_error_on_data_endpoint() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/OAUth/v1");
            then.status(200)
                .json_body(json!({"items": {"tokenautenticacao": "abc123"}}));
        })
        .await;
    let inventory = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/HidroInventarioEstacoes/v1")
                .query_param("Unidade Federativa", "RJ");
            then.status(500);
        })
        .await;

    let err = client(&server)
        .inventory()
        .search()
        .state("RJ".parse().unwrap())
        .call()
        .await
        .unwrap_err();

    inventory.assert_async().await;
    match err {
        HidrowebError::Transport(TransportError::HttpStatus { status, url }) => {
            assert_eq!(status.as_u16(), 500);
            assert!(url.ends_with("/HidroInventarioEstacoes/v1"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_body_without_envelope_is_a_call_failure() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/OAUth/v1");
            then.status(200)
                .json_body(json!({"items": {"tokenautenticacao": "abc123"}}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/HidroInventarioEstacoes/v1");
            then.status(200).json_body(json!([{"codigoestacao": "2243004"}]));
        })
        .await;

    let err = client(&server)
        .inventory()
        .station(2243004)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        HidrowebError::Transport(TransportError::Envelope { .. })
    ));
    assert_eq!(err.category(), ErrorCategory::CallFailed);
}
