// SPDX-License-Identifier: Apache-2.0

//! A single `file_contexts` entry: a path regex, an optional object-type
//! restriction, and a context.

use bitflags::bitflags;
use secpol_model::context::SecurityContext;

/// The object-type restriction a `file_contexts` line's type-spec names.
/// Each entry carries exactly one of these (or `Any` when the type-spec
/// is absent) — the policy source format never lets a line cover more
/// than one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectType {
    Regular,
    Directory,
    CharDevice,
    BlockDevice,
    Symlink,
    Socket,
    NamedPipe,
    Any,
}

impl ObjectType {
    /// Parse a type-spec token (`--`, `-d`, `-c`, `-b`, `-l`, `-s`, `-p`).
    pub fn from_spec(spec: &str) -> Option<Self> {
        Some(match spec {
            "--" => ObjectType::Regular,
            "-d" => ObjectType::Directory,
            "-c" => ObjectType::CharDevice,
            "-b" => ObjectType::BlockDevice,
            "-l" => ObjectType::Symlink,
            "-s" => ObjectType::Socket,
            "-p" => ObjectType::NamedPipe,
            _ => return None,
        })
    }
}

bitflags! {
    /// A query's object-type filter: any combination of [`ObjectType`]
    /// kinds, used to select which entries to consider. `Any` in a query
    /// mask means "match every kind", not the `ObjectType::Any` entry
    /// kind specifically.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ObjectTypeMask: u8 {
        const REGULAR      = 1 << 0;
        const DIRECTORY    = 1 << 1;
        const CHAR_DEVICE  = 1 << 2;
        const BLOCK_DEVICE = 1 << 3;
        const SYMLINK      = 1 << 4;
        const SOCKET       = 1 << 5;
        const NAMED_PIPE   = 1 << 6;
        const ANY_ENTRY    = 1 << 7;
        const ALL = Self::REGULAR.bits() | Self::DIRECTORY.bits() | Self::CHAR_DEVICE.bits()
            | Self::BLOCK_DEVICE.bits() | Self::SYMLINK.bits() | Self::SOCKET.bits()
            | Self::NAMED_PIPE.bits() | Self::ANY_ENTRY.bits();
    }
}

impl ObjectTypeMask {
    pub fn matches(&self, ty: ObjectType) -> bool {
        let bit = match ty {
            ObjectType::Regular => ObjectTypeMask::REGULAR,
            ObjectType::Directory => ObjectTypeMask::DIRECTORY,
            ObjectType::CharDevice => ObjectTypeMask::CHAR_DEVICE,
            ObjectType::BlockDevice => ObjectTypeMask::BLOCK_DEVICE,
            ObjectType::Symlink => ObjectTypeMask::SYMLINK,
            ObjectType::Socket => ObjectTypeMask::SOCKET,
            ObjectType::NamedPipe => ObjectTypeMask::NAMED_PIPE,
            ObjectType::Any => ObjectTypeMask::ANY_ENTRY,
        };
        self.contains(bit)
    }
}

/// A context as it appears on an fc-list entry. `<<none>>` means the
/// path is explicitly unlabeled; the other two variants are the
/// unvalidated/validated storage modes the list supports depending on
/// whether a policy model was available at insertion time.
#[derive(Debug, Clone)]
pub enum FcContext {
    NoLabel,
    Raw {
        user: String,
        role: String,
        ty: String,
        range: Option<String>,
    },
    Resolved(SecurityContext),
}

#[derive(Debug, Clone)]
pub struct FcEntry {
    pub path_regex: String,
    pub object_type: ObjectType,
    pub context: FcContext,
}
