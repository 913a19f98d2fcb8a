use rocket::http::{ContentType, Header, Status};
use rocket::routes;
use vehicle_explorer_api::auth::{AuthConfig, AuthState, JwtService, PasswordService};
use vehicle_explorer_api::models::Vehicle;
use vehicle_explorer_api::routes::vehicles;
use vehicle_explorer_api::test_support::{TestDatabase, TestFixtures, TestRocketBuilder};

fn test_auth_state() -> AuthState {
    let config = AuthConfig {
        issuer: "https://vehicle-explorer.test".into(),
        audience: "vehicle-explorer".into(),
        access_token_ttl_secs: 3600,
        jwt_secret: "integration-test-secret".into(),
    };
    let password_service = PasswordService::new().expect("password service");
    let jwt_service = JwtService::from_config(&config).expect("jwt service");
    AuthState::new(config, password_service, jwt_service)
}

#[tokio::test]
async fn vehicle_creation_validates_manufacturer_reference() {
    let test_db = TestDatabase::new()
        .await
        .expect("failed to provision test database");
    let pool = test_db.pool_clone();

    let auth_state = test_auth_state();
    let fixtures = TestFixtures::new(&pool);

    let password_hash = auth_state
        .password_service
        .hash_password("super-secret")
        .expect("hash password");
    let user_id = fixtures
        .insert_user("driver@example.com", &password_hash)
        .await
        .expect("insert user");
    let manufacturer_id = fixtures
        .insert_manufacturer("Honda", Some("HND"))
        .await
        .expect("insert manufacturer");

    let token = auth_state
        .jwt_service
        .issue_access_token(user_id, "driver@example.com")
        .expect("issue token")
        .token;
    let bearer = Header::new("Authorization", format!("Bearer {token}"));

    let client = TestRocketBuilder::new()
        .manage_pg_pool(pool.clone())
        .manage_auth_state(auth_state)
        .mount_api_routes(routes![vehicles::create_vehicle, vehicles::get_vehicle])
        .async_client()
        .await;

    // Referencing a manufacturer that does not exist is rejected.
    let response = client
        .post("/api/vehicles")
        .header(ContentType::JSON)
        .header(bearer.clone())
        .body(r#"{"model_name":"Civic","year":2021,"manufacturer_id":9999}"#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    drop(response);

    let body = format!(
        r#"{{"model_name":"Civic","year":2021,"combined_mpg":"36.0","manufacturer_id":{manufacturer_id}}}"#
    );
    let response = client
        .post("/api/vehicles")
        .header(ContentType::JSON)
        .header(bearer.clone())
        .body(body)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Created);
    let created: Vehicle = response
        .into_json()
        .await
        .expect("payload should deserialize");
    assert_eq!(created.model_name, "Civic");
    assert_eq!(created.year, 2021);
    assert_eq!(created.manufacturer_id, manufacturer_id);

    let response = client
        .get(format!("/api/vehicles/{}", created.id))
        .header(bearer)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let fetched: Vehicle = response
        .into_json()
        .await
        .expect("payload should deserialize");
    assert_eq!(fetched.combined_mpg, Some("36.0".parse().unwrap()));

    drop(client);

    test_db.close().await.expect("failed to drop test database");
}
