use actix_web::{HttpResponse, http::header::ContentType, web};

use zero_shared::dto::Message;

const HELLO_PAGE: &str = r#"<html>
  <head>
    <title>Zero says hello</title>
  </head>
  <body>
    <h1>Hello World</h1>
  </body>
</html>"#;

/// GET /
pub async fn read_root() -> web::Json<Message> {
    web::Json(Message::new("Hello World!"))
}

/// GET /hello
pub async fn hello() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(HELLO_PAGE)
}
