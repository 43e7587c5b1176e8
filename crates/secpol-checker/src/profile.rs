// SPDX-License-Identifier: Apache-2.0

//! Profile documents: an XML listing of which modules to run, their
//! output mode, and option overrides.

use secpol_common::{Error, Result};
use xml::attribute::OwnedAttribute;
use xml::reader::{EventReader, XmlEvent};

/// The framework version a profile's `<sechecker version="...">` root
/// is checked against.
pub const FRAMEWORK_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Quiet,
    Short,
    Verbose,
    Default,
}

impl OutputMode {
    fn from_attr(s: &str) -> Result<Self> {
        match s {
            "quiet" => Ok(OutputMode::Quiet),
            "short" => Ok(OutputMode::Short),
            "verbose" => Ok(OutputMode::Verbose),
            "default" => Ok(OutputMode::Default),
            other => Err(Error::input(format!("unknown output mode '{other}'"))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProfileOption {
    pub name: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ProfileModule {
    pub name: String,
    pub output: OutputMode,
    pub options: Vec<ProfileOption>,
}

#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    pub desc: Option<String>,
    pub modules: Vec<ProfileModule>,
}

fn attr<'a>(attrs: &'a [OwnedAttribute], key: &str) -> Option<&'a str> {
    attrs.iter().find(|a| a.name.local_name == key).map(|a| a.value.as_str())
}

fn required_attr<'a>(attrs: &'a [OwnedAttribute], key: &str, element: &str) -> Result<&'a str> {
    attr(attrs, key).ok_or_else(|| Error::input(format!("<{element}> missing required attribute '{key}'")))
}

/// Parse and structurally validate a profile document. Unknown tags or
/// out-of-place elements are a parse error; this approximates the
/// embedded DTD's shape rather than implementing a general DTD engine.
pub fn parse_profile(xml: &str) -> Result<Profile> {
    let mut parser = EventReader::new(xml.as_bytes());

    let mut stack: Vec<String> = Vec::new();
    let mut profile_name: Option<String> = None;
    let mut desc: Option<String> = None;
    let mut desc_buf = String::new();
    let mut in_desc = false;
    let mut modules: Vec<ProfileModule> = Vec::new();
    let mut cur_module: Option<ProfileModule> = None;
    let mut cur_option: Option<ProfileOption> = None;

    loop {
        let event = parser
            .next()
            .map_err(|e| Error::input(format!("malformed profile xml: {e}")))?;
        match event {
            XmlEvent::StartElement { name, attributes, .. } => {
                let local = name.local_name.clone();
                let parent = stack.last().map(String::as_str);
                match (parent, local.as_str()) {
                    (None, "sechecker") => {
                        let version = required_attr(&attributes, "version", "sechecker")?;
                        if version != FRAMEWORK_VERSION {
                            return Err(Error::input(format!(
                                "profile targets framework version {version}, this build supports {FRAMEWORK_VERSION}"
                            )));
                        }
                    }
                    (Some("sechecker"), "profile") => {
                        profile_name = Some(required_attr(&attributes, "name", "profile")?.to_string());
                    }
                    (Some("profile"), "desc") => {
                        in_desc = true;
                        desc_buf.clear();
                    }
                    (Some("profile"), "module") => {
                        let name = required_attr(&attributes, "name", "module")?.to_string();
                        let output = match attr(&attributes, "output") {
                            Some(s) => OutputMode::from_attr(s)?,
                            None => OutputMode::Default,
                        };
                        cur_module = Some(ProfileModule { name, output, options: Vec::new() });
                    }
                    (Some("module"), "option") => {
                        let name = required_attr(&attributes, "name", "option")?.to_string();
                        cur_option = Some(ProfileOption { name, items: Vec::new() });
                    }
                    (Some("option"), "item") => {
                        let value = required_attr(&attributes, "value", "item")?.to_string();
                        if let Some(opt) = cur_option.as_mut() {
                            opt.items.push(value);
                        }
                    }
                    (parent, other) => {
                        return Err(Error::input(format!(
                            "unexpected element <{other}> inside <{}>",
                            parent.unwrap_or("document")
                        )));
                    }
                }
                stack.push(local);
            }
            XmlEvent::EndElement { .. } => {
                let local = stack.pop();
                match local.as_deref() {
                    Some("desc") => {
                        desc = Some(desc_buf.trim().to_string());
                        in_desc = false;
                    }
                    Some("option") => {
                        if let (Some(opt), Some(m)) = (cur_option.take(), cur_module.as_mut()) {
                            m.options.push(opt);
                        }
                    }
                    Some("module") => {
                        if let Some(m) = cur_module.take() {
                            modules.push(m);
                        }
                    }
                    _ => {}
                }
            }
            XmlEvent::Characters(s) => {
                if in_desc {
                    desc_buf.push_str(&s);
                }
            }
            XmlEvent::EndDocument => break,
            _ => {}
        }
    }

    let name = profile_name.ok_or_else(|| Error::input("profile missing <profile name=\"...\">"))?;
    Ok(Profile { name, desc, modules })
}
