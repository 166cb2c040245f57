//! Tests for route building and dispatch.

#[cfg(test)]
mod router_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use regex::Regex;
    use tokio::task::JoinSet;

    use crate::config::RouterOptions;
    use crate::error::{BoxError, Error};
    use crate::method::Method;
    use crate::router::{Context, HandlerFuture, Next, Router};

    // Handler that writes a fixed body
    fn respond(tag: &'static str) -> impl Fn(Context, Next) -> HandlerFuture + Send + Sync + 'static {
        move |mut ctx: Context, _next: Next| -> HandlerFuture {
            ctx.response.body = Some(tag.to_string());
            Box::pin(async move { Ok(ctx) })
        }
    }

    // Handler that writes one path parameter as the body
    fn echo(name: &'static str) -> impl Fn(Context, Next) -> HandlerFuture + Send + Sync + 'static {
        move |mut ctx: Context, _next: Next| -> HandlerFuture {
            ctx.response.body = ctx.request.param(name).map(str::to_string);
            Box::pin(async move { Ok(ctx) })
        }
    }

    async fn run(router: &Router, method: &str, url: &str) -> Context {
        router
            .as_middleware(Context::new(method, url), Next::end())
            .await
            .unwrap()
    }

    async fn body(router: &Router, method: &str, url: &str) -> Option<String> {
        run(router, method, url).await.response.body
    }

    #[tokio::test]
    async fn test_simple_parameter() {
        let router = Router::with_defaults(|r| {
            r.get("/user/:a", echo("a"))?;
            Ok(())
        })
        .unwrap();

        assert_eq!(body(&router, "GET", "/user/7f3a").await.as_deref(), Some("7f3a"));
        assert_eq!(
            body(&router, "GET", "/user/0.8263:x-y_z").await.as_deref(),
            Some("0.8263:x-y_z")
        );
    }

    #[tokio::test]
    async fn test_without_options() {
        let router = Router::with_defaults(|r| {
            r.get("/mypath", respond("plain"))?;
            Ok(())
        })
        .unwrap();

        assert_eq!(body(&router, "GET", "/mypath").await.as_deref(), Some("plain"));
    }

    #[tokio::test]
    async fn test_string_prefix() {
        let router = Router::new("/myprefix", |r| {
            r.get("/mypath", respond("prefixed"))?;
            Ok(())
        })
        .unwrap();

        assert_eq!(
            body(&router, "GET", "/myprefix/mypath").await.as_deref(),
            Some("prefixed")
        );
        assert_eq!(body(&router, "GET", "/mypath").await, None);
    }

    #[tokio::test]
    async fn test_full_options() {
        let options = RouterOptions::from("/myprefix").with_case(true).with_end(true);
        let router = Router::new(options, |r| {
            r.get("/myPath", respond("exact"))?;
            Ok(())
        })
        .unwrap();

        assert_eq!(
            body(&router, "GET", "/myprefix/myPath").await.as_deref(),
            Some("exact")
        );
        assert_eq!(body(&router, "GET", "/myprefix/mypath").await, None);
        assert_eq!(body(&router, "GET", "/myprefix/mypath/").await, None);
    }

    #[tokio::test]
    async fn test_options_from_json() {
        let options = RouterOptions::from_json(r#"{"prefix": "/v1", "end": true}"#).unwrap();
        let router = Router::new(options, |r| {
            r.get("/status", respond("ok"))?;
            Ok(())
        })
        .unwrap();

        assert_eq!(body(&router, "GET", "/V1/STATUS").await.as_deref(), Some("ok"));
        assert_eq!(body(&router, "GET", "/v1/status/extra").await, None);
    }

    #[tokio::test]
    async fn test_simple_nesting() {
        let router = Router::with_defaults(|r| {
            r.nest(&Router::new("/l1", |r| {
                r.get("/l2", respond("l2"))?;
                r.get("/l3", respond("l3"))?;
                r.nest(&Router::new("/l3", |r| {
                    r.get("/l4", respond("l4"))?;
                    Ok(())
                })?)?;
                Ok(())
            })?)?;
            r.get("/", respond("root"))?;
            Ok(())
        })
        .unwrap();

        assert_eq!(body(&router, "GET", "/").await.as_deref(), Some("root"));
        assert_eq!(body(&router, "GET", "/l1/l2").await.as_deref(), Some("l2"));
        assert_eq!(body(&router, "GET", "/l1/l3").await.as_deref(), Some("l3"));
        assert_eq!(body(&router, "GET", "/l1/l3/l4").await.as_deref(), Some("l4"));
    }

    #[tokio::test]
    async fn test_nested_prefix_is_required() {
        let child = Router::new("/l1", |r| {
            r.get("/l2", respond("l2"))?;
            Ok(())
        })
        .unwrap();
        let router = Router::with_defaults(move |r| {
            r.nest(&child)?;
            Ok(())
        })
        .unwrap();

        assert_eq!(body(&router, "GET", "/l1/l2").await.as_deref(), Some("l2"));
        assert!(router.dispatch("/l2", "GET").is_pass_through());
    }

    #[tokio::test]
    async fn test_nested_parameters() {
        let router = Router::with_defaults(|r| {
            r.nest(&Router::new("/l1", |r| {
                r.get("/l2/:a", echo("a"))?;
                Ok(())
            })?)?;
            Ok(())
        })
        .unwrap();

        assert_eq!(body(&router, "GET", "/l1/l2/0.42").await.as_deref(), Some("0.42"));
    }

    #[tokio::test]
    async fn test_nested_under_parameterized_prefix() {
        let router = Router::new("/users/:user", |r| {
            r.nest(&Router::new("/posts", |r| {
                r.get("/:post", |mut ctx: Context, _next: Next| async move {
                    let user = ctx.request.param("user").unwrap_or_default();
                    let post = ctx.request.param("post").unwrap_or_default();
                    ctx.response.body = Some(format!("{user}/{post}"));
                    Ok(ctx)
                })?;
                Ok(())
            })?)?;
            Ok(())
        })
        .unwrap();

        assert_eq!(
            body(&router, "GET", "/users/ada/posts/12").await.as_deref(),
            Some("ada/12")
        );
    }

    #[tokio::test]
    async fn test_method_priority() {
        let router = Router::with_defaults(|r| {
            r.get("/", respond("get"))?;
            r.post("/", respond("post"))?;
            r.all("/", respond("all"))?;
            Ok(())
        })
        .unwrap();

        assert_eq!(body(&router, "GET", "/").await.as_deref(), Some("get"));
        assert_eq!(body(&router, "POST", "/").await.as_deref(), Some("post"));
        assert_eq!(body(&router, "PUT", "/").await.as_deref(), Some("all"));
        assert_eq!(body(&router, "HEAD", "/").await.as_deref(), Some("all"));
        assert_eq!(router.dispatch("/", "get").resolved_method(), Some(Method::GET));
    }

    #[tokio::test]
    async fn test_all_declared_first_does_not_shadow_exact_method() {
        let router = Router::with_defaults(|r| {
            r.all("/items", respond("all"))?;
            r.delete("/items", respond("delete"))?;
            Ok(())
        })
        .unwrap();

        assert_eq!(body(&router, "DELETE", "/items").await.as_deref(), Some("delete"));
        assert_eq!(body(&router, "PATCH", "/items").await.as_deref(), Some("all"));
    }

    #[tokio::test]
    async fn test_missing_method_passes_through() {
        let router = Router::with_defaults(|r| {
            r.get("/only-get", respond("get"))?;
            Ok(())
        })
        .unwrap();

        let dispatch = router.dispatch("/only-get", "POST");
        assert!(dispatch.is_pass_through());
        assert!(dispatch.params().is_empty());
        assert!(router.dispatch("/only-get", "HEAD").is_pass_through());
        assert_eq!(body(&router, "POST", "/only-get").await, None);
    }

    #[tokio::test]
    async fn test_trailing_slash_routing() {
        let router = Router::with_defaults(|r| {
            r.get("/", respond("root"))?;
            r.get("/l1", respond("l1"))?;
            r.all("/l1/", respond("l1-slash"))?;
            Ok(())
        })
        .unwrap();

        assert_eq!(body(&router, "GET", "/").await.as_deref(), Some("root"));
        assert_eq!(body(&router, "GET", "/l1").await.as_deref(), Some("l1"));
        assert_eq!(body(&router, "GET", "/l1/").await.as_deref(), Some("l1-slash"));
    }

    #[tokio::test]
    async fn test_no_match_runs_next() {
        let router = Router::with_defaults(|r| {
            r.get("/known", respond("known"))?;
            Ok(())
        })
        .unwrap();

        let next = Next::new(|mut ctx: Context| async move {
            ctx.response.status = Some(404);
            Ok(ctx)
        });
        let ctx = router
            .as_middleware(Context::new("GET", "/unknown"), next)
            .await
            .unwrap();

        assert_eq!(ctx.response.status, Some(404));
        assert_eq!(ctx.response.body, None);
        assert!(ctx.request.params.is_empty());
    }

    #[tokio::test]
    async fn test_handler_can_yield_to_next() {
        let router = Router::with_defaults(|r| {
            r.get("/wrapped", |mut ctx: Context, next: Next| async move {
                ctx.response.body = Some("before".to_string());
                let mut ctx = next.run(ctx).await?;
                ctx.response.status = Some(201);
                Ok::<_, BoxError>(ctx)
            })?;
            Ok(())
        })
        .unwrap();

        let next = Next::new(|mut ctx: Context| async move {
            if let Some(body) = ctx.response.body.as_mut() {
                body.push_str("+downstream");
            }
            Ok(ctx)
        });
        let ctx = router
            .as_middleware(Context::new("GET", "/wrapped"), next)
            .await
            .unwrap();

        assert_eq!(ctx.response.body.as_deref(), Some("before+downstream"));
        assert_eq!(ctx.response.status, Some(201));
    }

    #[tokio::test]
    async fn test_handler_error_propagates() {
        let router = Router::with_defaults(|r| {
            r.post("/fail", |_ctx: Context, _next: Next| async move {
                Err(BoxError::from("handler failed"))
            })?;
            Ok(())
        })
        .unwrap();

        let result = router
            .as_middleware(Context::new("POST", "/fail"), Next::end())
            .await;
        assert_eq!(result.unwrap_err().to_string(), "handler failed");
    }

    #[tokio::test]
    async fn test_query_string_is_not_matched() {
        let router = Router::with_defaults(|r| {
            r.get("/search/:term", echo("term"))?;
            Ok(())
        })
        .unwrap();

        let ctx = run(&router, "GET", "/search/rust?page=2").await;
        assert_eq!(ctx.response.body.as_deref(), Some("rust"));
        assert_eq!(ctx.request.url, "/search/rust?page=2");
    }

    #[test]
    fn test_same_path_shares_one_entry() {
        let router = Router::with_defaults(|r| {
            r.get("/items", respond("get"))?
                .post("/items", respond("post"))?
                .route_named("patch", "/ITEMS", respond("patch"))?;
            Ok(())
        })
        .unwrap();

        assert_eq!(router.table().len(), 1);
        let (pattern, entry) = router.table().routes().next().unwrap();
        assert_eq!(pattern.source(), "(?i)^/items");
        assert_eq!(entry.methods(), vec![Method::GET, Method::POST, Method::PATCH]);
    }

    #[tokio::test]
    async fn test_redeclared_method_overwrites() {
        let router = Router::with_defaults(|r| {
            r.get("/page", respond("first"))?;
            r.get("/page", respond("second"))?;
            Ok(())
        })
        .unwrap();

        assert_eq!(router.table().len(), 1);
        assert_eq!(body(&router, "GET", "/page").await.as_deref(), Some("second"));
    }

    #[tokio::test]
    async fn test_nested_entry_replaces_existing_one() {
        let router = Router::with_defaults(|r| {
            r.get("/l1/l2", respond("direct"))?;
            r.post("/l1/l2", respond("direct-post"))?;
            r.nest(&Router::new("/l1", |r| {
                r.get("/l2", respond("nested"))?;
                Ok(())
            })?)?;
            Ok(())
        })
        .unwrap();

        assert_eq!(router.table().len(), 1);
        assert_eq!(body(&router, "GET", "/l1/l2").await.as_deref(), Some("nested"));
        assert!(router.dispatch("/l1/l2", "POST").is_pass_through());
    }

    #[test]
    fn test_nested_factory_does_not_accumulate_prefix() {
        let child = Router::new("/l1", |r| {
            r.get("/l2", respond("l2"))?;
            Ok(())
        })
        .unwrap();

        let first = child.nested_factory("/root").unwrap();
        let second = child.nested_factory("/root").unwrap();
        let sources = |table: &crate::router::RouteTable| {
            table
                .routes()
                .map(|(pattern, _)| pattern.source().to_string())
                .collect::<Vec<_>>()
        };

        assert_eq!(sources(&first), vec!["(?i)^/root/l1/l2"]);
        assert_eq!(sources(&first), sources(&second));
        assert_eq!(child.options().prefix, "/l1");
        assert!(child.dispatch("/l1/l2", "GET").resolved_method().is_some());
    }

    #[test]
    fn test_nested_factory_rejects_bad_prefix() {
        let child = Router::with_defaults(|_| Ok(())).unwrap();
        assert!(matches!(child.nested_factory("root"), Err(Error::InvalidPrefix(_))));
    }

    #[test]
    fn test_builder_runs_once_per_table() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let child = Router::new("/c", move |r| {
            counter.fetch_add(1, Ordering::SeqCst);
            r.get("/x", respond("x"))?;
            Ok(())
        })
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        for _ in 0..4 {
            child.dispatch("/c/x", "GET");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let child_for_parent = child.clone();
        Router::with_defaults(move |r| {
            r.nest(&child_for_parent)?;
            Ok(())
        })
        .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_invalid_path_fails_construction() {
        let result = Router::with_defaults(|r| {
            r.get("no-slash", respond("x"))?;
            Ok(())
        });
        assert!(matches!(result, Err(Error::InvalidPath(ref p)) if p == "no-slash"));
    }

    #[test]
    fn test_invalid_prefix_fails_construction() {
        let result = Router::new("/bad/", |_| Ok(()));
        assert!(matches!(result, Err(Error::InvalidPrefix(ref p)) if p == "/bad/"));

        let result = Router::with_defaults(|r| {
            r.nest(&Router::new("oops", |_| Ok(()))?)?;
            Ok(())
        });
        assert!(matches!(result, Err(Error::InvalidPrefix(_))));
    }

    #[test]
    fn test_duplicate_param_fails_construction() {
        let result = Router::with_defaults(|r| {
            r.get("/:a/:a", respond("x"))?;
            Ok(())
        });
        assert!(matches!(result, Err(Error::DuplicateParam { ref name, .. }) if name == "a"));
    }

    #[test]
    fn test_unknown_method_name_fails_construction() {
        let result = Router::with_defaults(|r| {
            r.route_named("OPTIONS", "/x", respond("x"))?;
            Ok(())
        });
        assert!(matches!(result, Err(Error::InvalidMethod(ref m)) if m == "OPTIONS"));
    }

    #[test]
    fn test_longest_match_wins() {
        let router = Router::with_defaults(|r| {
            r.get("/", respond("root"))?;
            r.get("/docs", respond("docs"))?;
            r.get("/docs/:page", respond("page"))?;
            Ok(())
        })
        .unwrap();

        let dispatch = router.dispatch("/docs/intro", "GET");
        assert_eq!(dispatch.matched_pattern(), Some(r"(?i)^/docs/[A-Za-z0-9\-_.:]+"));
        assert_eq!(dispatch.params().get("page"), Some("intro"));
        assert!(!dispatch.is_ambiguous());

        let dispatch = router.dispatch("/other", "GET");
        assert_eq!(dispatch.matched_pattern(), Some("(?i)^/"));
    }

    #[test]
    fn test_equal_matches_use_declaration_order() {
        let router = Router::with_defaults(|r| {
            r.get("/user/:id", echo("id"))?;
            r.get("/user/me", respond("me"))?;
            Ok(())
        })
        .unwrap();

        let dispatch = router.dispatch("/user/me", "GET");
        assert!(dispatch.is_ambiguous());
        assert_eq!(dispatch.params().get("id"), Some("me"));

        let dispatch = router.dispatch("/user/42", "GET");
        assert!(!dispatch.is_ambiguous());
    }

    #[test]
    fn test_native_pattern_captures() {
        let router = Router::new("/ignored", |r| {
            let pattern = Regex::new(r"^/files/(?P<name>[a-z]+)\.(?P<ext>[a-z]+)$")?;
            r.get(pattern, respond("file"))?;
            Ok(())
        })
        .unwrap();

        let dispatch = router.dispatch("/files/report.pdf", "GET");
        assert_eq!(dispatch.params().get("name"), Some("report"));
        assert_eq!(dispatch.params().get("ext"), Some("pdf"));
        assert!(router.dispatch("/ignored/files/report.pdf", "GET").is_pass_through());
    }

    #[tokio::test]
    async fn test_router_as_chain_stage() {
        let api = Router::new("/api", |r| {
            r.get("/ping", respond("pong"))?;
            Ok(())
        })
        .unwrap();
        let site = Router::with_defaults(|r| {
            r.get("/about", respond("about"))?;
            Ok(())
        })
        .unwrap();

        let site_stage = site.middleware();
        let make_next = move || {
            let stage = site_stage.clone();
            Next::new(move |ctx: Context| stage(ctx, Next::end()))
        };

        let ctx = api
            .as_middleware(Context::new("GET", "/about"), make_next())
            .await
            .unwrap();
        assert_eq!(ctx.response.body.as_deref(), Some("about"));

        let ctx = api
            .as_middleware(Context::new("GET", "/api/ping"), make_next())
            .await
            .unwrap();
        assert_eq!(ctx.response.body.as_deref(), Some("pong"));
    }

    #[tokio::test]
    async fn test_concurrent_dispatch() {
        let router = Router::with_defaults(|r| {
            r.get("/user/:id", echo("id"))?;
            Ok(())
        })
        .unwrap();

        let mut tasks = JoinSet::new();
        for i in 0..32 {
            let router = router.clone();
            tasks.spawn(async move {
                let url = format!("/user/{i}");
                let ctx = router
                    .as_middleware(Context::new("GET", url), Next::end())
                    .await
                    .unwrap();
                (i, ctx.response.body)
            });
        }

        while let Some(result) = tasks.join_next().await {
            let (i, body) = result.unwrap();
            assert_eq!(body, Some(i.to_string()));
        }
    }

    #[test]
    fn test_params_serialize_as_json_object() {
        let router = Router::with_defaults(|r| {
            r.get("/repos/:org/:repo", respond("repo"))?;
            Ok(())
        })
        .unwrap();

        let dispatch = router.dispatch("/repos/rust-lang/regex", "GET");
        let json = serde_json::to_value(dispatch.params()).unwrap();
        assert_eq!(json, serde_json::json!({"org": "rust-lang", "repo": "regex"}));
    }
}
