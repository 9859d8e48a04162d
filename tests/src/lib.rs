#[cfg(test)]
mod tests {
    use pactwright::{
        mock_provider_url, pact_test, Error, Interaction, Matcher, MismatchKind, PactConfiguration,
        PactSession, ProviderState, RegexMatch, Request, Response, Template,
    };
    use reqwest::{blocking::Client, StatusCode};
    use serde_json::{json, Value};
    use std::{
        fs,
        path::{Path, PathBuf},
    };

    fn init_logging() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    fn friends_online() -> Interaction {
        Interaction::new(
            "Zach checks friends online",
            Request::new("GET", "/friends").with_query_param("status", "online"),
            Response::new(200)
                .with_header("Content-Type", "application/json")
                .with_body(Template::object(vec![(
                    "number",
                    Template::from(Matcher::like(1).unwrap()),
                )])),
        )
        .given(ProviderState::new("Zach has one friend online"))
    }

    fn message_gabe() -> Interaction {
        Interaction::new(
            "Zach messages gabe",
            Request::new("POST", RegexMatch::new("/gabe", r"/\w+").unwrap())
                .with_header(
                    "Authorization",
                    RegexMatch::new("Bearer ABCDE", r"Bearer \S+").unwrap(),
                )
                .with_body(Template::object(vec![(
                    "message",
                    Template::object(vec![(
                        "contents",
                        Template::from(RegexMatch::new("yooo", "yo+").unwrap()),
                    )]),
                )])),
            Response::new(201).with_body(json!({"message": {"contents": "ayee whatsup"}})),
        )
    }

    fn configure_pact(config: &mut PactConfiguration) {
        config.set_pact_directory(std::env::temp_dir().join("pactwright-tests"));
        config.add_interaction(friends_online());
    }

    #[pact_test("Zach", "Gabe", configure_pact)]
    fn served_response_is_the_plain_example() {
        let response = client()
            .get(format!("{}/friends?status=online", mock_provider_url()))
            .send()
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.json::<Value>().unwrap(), json!({"number": 1}));
    }

    /// Aborts the session if the test panics before finishing it.
    struct Session {
        finished: bool,
    }

    impl Session {
        fn finish(mut self) -> Result<PathBuf, Error> {
            self.finished = true;
            PactSession::after_test()
        }
    }

    impl Drop for Session {
        fn drop(&mut self) {
            if !self.finished {
                PactSession::abort_test();
            }
        }
    }

    fn session(directory: &Path, interactions: Vec<Interaction>) -> Session {
        init_logging();
        let mut configuration = PactConfiguration::new("Zach", "Gabe");
        configuration.set_pact_directory(directory);
        for interaction in interactions {
            configuration.add_interaction(interaction);
        }
        PactSession::before_test(configuration).unwrap();
        Session { finished: false }
    }

    fn send_message(body: Value) -> reqwest::blocking::Response {
        client()
            .post(format!("{}/gabe", mock_provider_url()))
            .header("Authorization", "Bearer ABCDE")
            .json(&body)
            .send()
            .unwrap()
    }

    #[test]
    fn session_writes_the_pact_with_matching_rules() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(dir.path(), vec![message_gabe()]);

        let response = send_message(json!({"message": {"contents": "yooo"}}));
        assert_eq!(response.status(), StatusCode::CREATED);

        let path = session.finish().unwrap();
        assert_eq!(path, dir.path().join("Zach-Gabe.pact.json"));

        let document: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let request = &document["interactions"][0]["request"];
        assert_eq!(request["path"], json!("/gabe"));
        assert_eq!(request["body"], json!({"message": {"contents": "yooo"}}));
        assert_eq!(
            request["matchingRules"],
            json!({
                "path": {"matchers": [{"match": "regex", "regex": r"/\w+"}]},
                "header": {"Authorization": {"matchers": [{"match": "regex", "regex": r"Bearer \S+"}]}},
                "body": {"$.message.contents": {"matchers": [{"match": "regex", "regex": "yo+"}]}}
            })
        );
        assert_eq!(document["metadata"], json!({"pactSpecification": {"version": "3.0.0"}}));
    }

    #[test]
    fn body_mismatch_fails_the_session_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(dir.path(), vec![message_gabe()]);

        send_message(json!({"message": {"contents": "nope"}}));

        match session.finish() {
            Err(Error::RequestMismatch(mismatch)) => {
                assert_eq!(mismatch.description, "Zach messages gabe");
                assert!(matches!(mismatch.kind, MismatchKind::Body { .. }));
            }
            other => panic!("expected a request mismatch, got {:?}", other),
        }
        assert!(!dir.path().join("Zach-Gabe.pact.json").exists());
    }

    #[test]
    fn unexpected_call_gets_a_server_error_and_fails_the_session() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(dir.path(), vec![friends_online()]);

        let response = client()
            .delete(format!("{}/friends", mock_provider_url()))
            .send()
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        assert!(matches!(
            session.finish(),
            Err(Error::UnexpectedCall { .. })
        ));
        assert!(!dir.path().join("Zach-Gabe.pact.json").exists());
    }

    #[test]
    fn sessions_accumulate_into_one_deduplicated_pact() {
        let dir = tempfile::tempdir().unwrap();

        for _ in 0..3 {
            let first = session(dir.path(), vec![friends_online()]);
            client()
                .get(format!("{}/friends?status=online", mock_provider_url()))
                .send()
                .unwrap();
            first.finish().unwrap();

            let second = session(dir.path(), vec![message_gabe()]);
            send_message(json!({"message": {"contents": "yooo"}}));
            second.finish().unwrap();
        }

        let document: Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("Zach-Gabe.pact.json")).unwrap(),
        )
        .unwrap();
        let descriptions: Vec<&str> = document["interactions"]
            .as_array()
            .unwrap()
            .iter()
            .map(|interaction| interaction["description"].as_str().unwrap())
            .collect();
        assert_eq!(
            descriptions,
            vec!["Zach checks friends online", "Zach messages gabe"]
        );
    }

    #[test]
    fn aborted_session_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let session = session(dir.path(), vec![friends_online()]);

        drop(session);

        assert!(!dir.path().join("Zach-Gabe.pact.json").exists());
    }
}
