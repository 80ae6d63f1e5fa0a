use ar_domain::config::Config;

#[test]
fn default_host_is_localhost() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
}

#[test]
fn explicit_zero_host_parses() {
    let toml_str = r#"
[server]
host = "0.0.0.0"
port = 3000
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.server.host, "0.0.0.0");
}

#[test]
fn default_cors_allows_only_localhost() {
    let config = Config::default();
    assert!(config.server.cors.allowed_origins.contains(&"http://localhost:*".to_string()));
    assert!(config.server.cors.allowed_origins.contains(&"http://127.0.0.1:*".to_string()));
}

#[test]
fn default_template_paths_try_local_then_parent() {
    let config = Config::default();
    let paths: Vec<String> = config
        .prompt
        .template_paths
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    assert_eq!(
        paths,
        vec!["agent/system_prompt.txt", "../agent/system_prompt.txt"]
    );
}

#[test]
fn full_config_file_parses() {
    let toml_str = r#"
[server]
port = 8080

[bey]
base_url = "http://localhost:9999/v1"
api_key_env = "MY_BEY_KEY"
timeout_ms = 2000
default_avatar_id = "avatar-x"

[prompt]
template_paths = ["/etc/recruiter/prompt.txt"]

[outputs]
dir = "/var/lib/recruiter/outputs"

[observability]
service_name = "recruiter"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.server.port, 8080);
    assert_eq!(config.bey.base_url, "http://localhost:9999/v1");
    assert_eq!(config.bey.api_key_env, "MY_BEY_KEY");
    assert_eq!(config.bey.timeout_ms, 2000);
    assert_eq!(config.bey.default_avatar_id, "avatar-x");
    assert_eq!(config.prompt.template_paths.len(), 1);
    assert_eq!(
        config.outputs.dir.display().to_string(),
        "/var/lib/recruiter/outputs"
    );
    assert_eq!(config.observability.service_name, "recruiter");
    // Unlisted sections keep their defaults.
    assert_eq!(config.bey.embed_base_url, "https://bey.chat");
}

#[test]
fn shipped_config_matches_defaults() {
    let config: Config = toml::from_str(include_str!("../../../config.toml")).unwrap();
    let defaults = Config::default();
    assert_eq!(config.server.port, defaults.server.port);
    assert_eq!(config.bey.base_url, defaults.bey.base_url);
    assert_eq!(config.bey.avatars, defaults.bey.avatars);
    assert_eq!(config.prompt.template_paths, defaults.prompt.template_paths);
    assert_eq!(config.outputs.dir, defaults.outputs.dir);
}
