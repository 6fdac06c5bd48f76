use actix_web::{HttpResponse, Responder, get, web};

use super::models::{AppState, BalanceResponse};

/// Balance of an address, replayed from the sealed chain.
#[get("/balance/{address}/")]
pub async fn get_balance(state: web::Data<AppState>, path: web::Path<(String,)>) -> impl Responder {
    let address = path.into_inner().0;

    let balance = {
        let ledger = state.ledger.lock().expect("mutex poisoned");
        ledger.balance_of(&address)
    };

    HttpResponse::Ok().json(BalanceResponse { address, balance })
}

#[cfg(test)]
mod tests {
    use actix_web::{App, test, web};
    use serde_json::Value;

    use crate::api::{AppState, init_routes};
    use crate::config::Config;

    #[actix_web::test]
    async fn mining_reward_shows_up_in_balance() {
        let state = web::Data::new(AppState::new(&Config {
            difficulty: 2,
            reward_receiver: "carol".into(),
            ..Config::default()
        }));
        let app = test::init_service(App::new().app_data(state.clone()).configure(init_routes)).await;

        for _ in 0..2 {
            let req = test::TestRequest::post().uri("/api/v1/mine/").to_request();
            let _: Value = test::call_and_read_body_json(&app, req).await;
        }

        let req = test::TestRequest::get().uri("/api/v1/balance/carol/").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["address"], "carol");
        assert_eq!(body["balance"], 2.0);

        let uri = format!("/api/v1/balance/{}/", state.node_id);
        let req = test::TestRequest::get().uri(&uri).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["balance"], -2.0);
    }
}
