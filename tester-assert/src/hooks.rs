//! Test-hook visibility checks.
//!
//! A test hook is a field that only exists so tests can substitute
//! behaviour, such as a clock or a sleep function. Rust has no field tags,
//! so a type lists its fields, their visibility and any hook annotation
//! through [`Describe`]:
//!
//! ```ignore
//! impl Describe for Sleeper {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::exported("Sleeper")
//!             .field(FieldDescriptor::private("sleep", "fn(Duration)").hook("verify-unexported"))
//!     }
//! }
//!
//! assert::for_test(&t).that_type::<Sleeper>().hides_test_hooks();
//! ```

use crate::context::AssertionContext;
use crate::result::AssertionResult;
use std::fmt;

/// Annotation key marking a field as a test hook.
pub const TEST_HOOK_KEY: &str = "test-hook";

/// Structural description of a type's visible surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDescriptor {
    /// `None` for anonymous types.
    pub name: Option<String>,
    pub exported: bool,
    pub fields: Vec<FieldDescriptor>,
}

impl TypeDescriptor {
    pub fn exported(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            exported: true,
            fields: Vec::new(),
        }
    }

    pub fn private(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            exported: false,
            fields: Vec::new(),
        }
    }

    pub fn anonymous() -> Self {
        Self {
            name: None,
            exported: false,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Whether anything of this type is visible outside its module.
    pub fn is_visible(&self) -> bool {
        self.exported && self.name.as_deref().map_or(false, |name| !name.is_empty())
    }

    /// Fields annotated as test hooks that are visible anyway.
    pub fn exported_test_hooks(&self) -> Vec<&FieldDescriptor> {
        if !self.is_visible() {
            return Vec::new();
        }
        self.fields
            .iter()
            .filter(|field| field.is_test_hook() && field.exported)
            .collect()
    }
}

/// One field of a [`TypeDescriptor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub type_name: String,
    /// For embedded fields, whether the embedded type is exported.
    pub exported: bool,
    pub embedded: bool,
    /// Value of the `test-hook` annotation, if any.
    pub hook: Option<String>,
}

impl FieldDescriptor {
    pub fn public(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::named(name.into(), type_name.into(), true)
    }

    pub fn private(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::named(name.into(), type_name.into(), false)
    }

    /// A field that embeds another type and takes its name from it.
    pub fn embedded(type_name: impl Into<String>, type_exported: bool) -> Self {
        let type_name = type_name.into();
        Self {
            name: type_name.trim_start_matches(|c| c == '&' || c == '*').to_owned(),
            type_name,
            exported: type_exported,
            embedded: true,
            hook: None,
        }
    }

    fn named(name: String, type_name: String, exported: bool) -> Self {
        Self {
            name,
            type_name,
            exported,
            embedded: false,
            hook: None,
        }
    }

    /// Annotate the field as a test hook with the given purpose.
    pub fn hook(mut self, purpose: impl Into<String>) -> Self {
        self.hook = Some(purpose.into());
        self
    }

    /// An empty purpose is the same as no annotation.
    pub fn is_test_hook(&self) -> bool {
        self.hook.as_deref().map_or(false, |purpose| !purpose.is_empty())
    }
}

impl fmt::Display for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{Name:{} Type:{}", self.name, self.type_name)?;
        if let Some(purpose) = &self.hook {
            write!(f, " Tag:{}:{:?}", TEST_HOOK_KEY, purpose)?;
        }
        write!(f, " Embedded:{}}}", self.embedded)
    }
}

/// Types that can describe their own fields.
pub trait Describe {
    fn describe() -> TypeDescriptor;
}

/// Assertions on a described type.
#[must_use = "call an assertion such as `hides_test_hooks` on the type"]
pub struct AssertableType<'t> {
    ctx: AssertionContext<'t>,
    descriptor: TypeDescriptor,
}

impl<'t> AssertableType<'t> {
    pub(crate) fn new(ctx: AssertionContext<'t>, descriptor: TypeDescriptor) -> Self {
        Self { ctx, descriptor }
    }

    /// Assert that no field annotated as a test hook is exported.
    ///
    /// All offending fields are reported in one message.
    pub fn hides_test_hooks(self) -> AssertionResult<'t, TypeDescriptor, Vec<FieldDescriptor>> {
        let offenders: Vec<FieldDescriptor> = self
            .descriptor
            .exported_test_hooks()
            .into_iter()
            .cloned()
            .collect();

        if !offenders.is_empty() {
            let listed: Vec<String> = offenders.iter().map(ToString::to_string).collect();
            self.ctx.report(format_args!(
                "Type {} exports test-hook fields: [{}]\n",
                self.descriptor.name.as_deref().unwrap_or_default(),
                listed.join(" "),
            ));
        }
        AssertionResult::new(offenders.is_empty(), self.descriptor, offenders, self.ctx.reporter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::testing::mock_context;
    use crate::reporter::Recorder;

    fn hides(recorder: &Recorder, descriptor: TypeDescriptor) -> bool {
        mock_context(recorder, &[])
            .that_type_descriptor(descriptor)
            .hides_test_hooks()
            .passed()
    }

    #[test]
    fn test_passing_types() {
        let recorder = Recorder::new();
        let cases = vec![
            TypeDescriptor::exported("EmptyType"),
            TypeDescriptor::exported("PassingFieldsType")
                .field(FieldDescriptor::public("ExportedTestHook", "fn()").hook(""))
                .field(FieldDescriptor::embedded("ExportedType", true))
                .field(FieldDescriptor::private("unexported_test_hook", "fn()").hook("verify-unexported"))
                .field(FieldDescriptor::embedded("UnexportedType", false).hook("verify-unexported"))
                .field(FieldDescriptor::embedded("*UnexportedPointerType", false).hook("verify-unexported")),
            TypeDescriptor::anonymous()
                .field(FieldDescriptor::public("ExportedTestHook", "fn()").hook("verify-unexported"))
                .field(FieldDescriptor::embedded("ExportedType", true).hook("verify-unexported")),
            TypeDescriptor::private("Hidden")
                .field(FieldDescriptor::public("exported_test_hook", "fn()").hook("verify-unexported")),
        ];

        for descriptor in cases {
            assert!(hides(&recorder, descriptor));
        }
        assert_eq!(recorder.output(), "");
        assert!(!recorder.failed());
    }

    #[test]
    fn test_exported_hooks_reported_together() {
        let recorder = Recorder::new();
        let descriptor = TypeDescriptor::exported("ExposedFieldsType")
            .field(FieldDescriptor::public("exported_test_hook", "fn()").hook("verify-unexported"))
            .field(FieldDescriptor::embedded("ExportedType", true).hook("verify-unexported"))
            .field(FieldDescriptor::embedded("*ExportedPointerType", true).hook("verify-unexported"));

        assert!(!hides(&recorder, descriptor));
        insta::assert_snapshot!(recorder.output(), @r###"file:3: Type ExposedFieldsType exports test-hook fields: [{Name:exported_test_hook Type:fn() Tag:test-hook:"verify-unexported" Embedded:false} {Name:ExportedType Type:ExportedType Tag:test-hook:"verify-unexported" Embedded:true} {Name:ExportedPointerType Type:*ExportedPointerType Tag:test-hook:"verify-unexported" Embedded:true}]"###);
        assert_eq!(recorder.failure_count(), 1);
    }

    #[test]
    fn test_embedded_field_named_after_its_type() {
        let field = FieldDescriptor::embedded("&Inner", false);
        assert_eq!(field.name, "Inner");
        assert!(!field.is_test_hook());
    }
}
