mod frontmatter;
mod hooks;
mod options;
