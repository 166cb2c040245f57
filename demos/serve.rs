//! A toy HTTP front end that routes requests through microroute-rs.
//!
//! Run with `RUST_LOG=debug` to see route registration and dispatch.

use std::error::Error;

use log::{error, info};
use microroute_rs::{BoxError, Context, Next, Router, RouterOptions};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

fn build_router() -> Result<Router, microroute_rs::Error> {
    let users = Router::new("/users", |r| {
        r.get("/:id", |mut ctx: Context, _next: Next| async move {
            let params = ctx.request.params.clone();
            ctx.response.set_json(&params)?;
            Ok::<_, BoxError>(ctx)
        })?;
        r.delete("/:id", |mut ctx: Context, _next: Next| async move {
            ctx.response.status = Some(204);
            Ok(ctx)
        })?;
        Ok(())
    })?;

    Router::new(RouterOptions::from("/api"), move |r| {
        r.get("/health", |mut ctx: Context, _next: Next| async move {
            ctx.response.body = Some("ok".to_string());
            Ok(ctx)
        })?;
        r.nest(&users)?;
        Ok(())
    })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        204 => "No Content",
        400 => "Bad Request",
        404 => "Not Found",
        _ => "Internal Server Error",
    }
}

async fn handle(mut socket: TcpStream, router: Router) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut buf = vec![0; 8192];
    let n = socket.read(&mut buf).await?;
    if n == 0 {
        return Ok(());
    }

    // Only the request line is needed for routing
    let head = String::from_utf8_lossy(&buf[..n]);
    let mut parts = head.lines().next().unwrap_or_default().split_whitespace();
    let (status, body) = match (parts.next(), parts.next()) {
        (Some(method), Some(url)) => {
            let not_found = Next::new(|mut ctx: Context| async move {
                ctx.response.status.get_or_insert(404);
                Ok(ctx)
            });
            let ctx = router.as_middleware(Context::new(method, url), not_found).await?;
            (
                ctx.response.status.unwrap_or(200),
                ctx.response.body.unwrap_or_default(),
            )
        }
        _ => (400, String::new()),
    };

    let response = format!(
        "HTTP/1.1 {status} {reason}\r\nContent-Length: {len}\r\nConnection: close\r\n\r\n{body}",
        reason = reason(status),
        len = body.len()
    );
    socket.write_all(response.as_bytes()).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    env_logger::init();

    let router = build_router()?;
    router.log_routes();

    let listener = TcpListener::bind("127.0.0.1:8080").await?;
    info!("Listening on http://127.0.0.1:8080");

    loop {
        let (socket, addr) = listener.accept().await?;
        let router = router.clone();
        tokio::spawn(async move {
            if let Err(e) = handle(socket, router).await {
                error!("Error handling connection from {addr}: {e}");
            }
        });
    }
}
