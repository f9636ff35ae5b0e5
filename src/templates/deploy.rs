//! Deployment templates for `warhorse deploy`.
//!
//! Each target is a small set of files written into the project root.

/// Deployment targets with an embedded template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployTarget {
    /// Travis CI build and npm deploy
    Travis,
    /// GitHub Actions workflow publishing to GitHub Pages
    Github,
    /// Netlify site build
    Netlify,
}

impl DeployTarget {
    pub const ALL: [DeployTarget; 3] = [DeployTarget::Travis, DeployTarget::Github, DeployTarget::Netlify];

    /// Parse target name from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "travis" => Some(Self::Travis),
            "github" | "gh-pages" => Some(Self::Github),
            "netlify" => Some(Self::Netlify),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Travis => "travis",
            Self::Github => "github",
            Self::Netlify => "netlify",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Travis => "Travis CI: test on push, publish to npm on tags",
            Self::Github => "GitHub Actions: test and publish dist/ to GitHub Pages",
            Self::Netlify => "Netlify: build and serve dist/",
        }
    }

    /// Files as `(relative path, contents)` pairs.
    pub fn files(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            Self::Travis => &[(".travis.yml", TRAVIS)],
            Self::Github => &[(".github/workflows/deploy.yml", GITHUB)],
            Self::Netlify => &[("netlify.toml", NETLIFY)],
        }
    }
}

const TRAVIS: &str = r#"language: node_js
node_js:
  - "lts/*"
install:
  - npm ci
  - cargo install warhorse
script:
  - warhorse test
  - warhorse build
  - warhorse distribute
deploy:
  provider: npm
  api_token: $NPM_TOKEN
  on:
    tags: true
"#;

const GITHUB: &str = r#"name: deploy

on:
  push:
    branches: [main]

permissions:
  contents: read
  pages: write
  id-token: write

jobs:
  deploy:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - uses: actions/setup-node@v4
        with:
          node-version: lts/*
      - run: npm ci
      - run: cargo install warhorse
      - run: warhorse test
      - run: warhorse build
      - run: warhorse distribute
      - uses: actions/upload-pages-artifact@v3
        with:
          path: dist
      - uses: actions/deploy-pages@v4
"#;

const NETLIFY: &str = r#"[build]
  command = "npm ci && cargo install warhorse && warhorse build && warhorse distribute"
  publish = "dist"
"#;
