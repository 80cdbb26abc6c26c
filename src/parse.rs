pub type Input<'a> = &'a [u8];
pub type Result<'a, O> = nom::IResult<Input<'a>, O, nom::error::VerboseError<Input<'a>>>;

/// Implements a `parse` function for an input enum, that allows it to be
/// parsed in terms of a numeric type.
///
/// Shamelessly borrowed from fasterthanlime's executable packer tutorial:
/// https://fasterthanli.me/series/making-our-own-executable-packer
#[macro_export]
macro_rules! impl_parse_for_enum {
    ($type: ident, $number_parser: ident) => {
        impl $type {
            pub fn parse(i: $crate::parse::Input) -> $crate::parse::Result<Self> {
                use nom::{
                    combinator::map_res,
                    error::{context, ErrorKind},
                    number::complete::$number_parser,
                };

                let parser = map_res($number_parser, |x| {
                    Self::try_from(x).map_err(|_| ErrorKind::Alt)
                });
                context(stringify!($type), parser)(i)
            }
        }
    };
}

/// Render a nom error as a single line of the form
/// `outer context (at 0x..) => inner context (at 0x..) => error kind (at 0x..)`, with offsets
/// measured from the start of `original`.
pub fn pretty_error_message(original: Input, err: nom::Err<nom::error::VerboseError<Input>>) -> String {
    use nom::error::VerboseErrorKind;

    match err {
        nom::Err::Incomplete(needed) => format!("incomplete input ({:?})", needed),
        nom::Err::Error(e) | nom::Err::Failure(e) => e
            .errors
            .iter()
            .rev()
            .map(|(at, kind)| {
                let offset = (at.as_ptr() as usize).saturating_sub(original.as_ptr() as usize);
                match kind {
                    VerboseErrorKind::Context(ctx) => format!("{} (at 0x{:x})", ctx, offset),
                    other => format!("{:?} (at 0x{:x})", other, offset),
                }
            })
            .collect::<Vec<_>>()
            .join(" => "),
    }
}

#[cfg(test)]
mod test {
    use super::pretty_error_message;
    use crate::parse;
    use nom::{bytes::complete::tag, error::context};

    #[test]
    fn test_pretty_error_message_lists_contexts_outermost_first() {
        let data = b"\xff\xd8nope";
        let rest = &data[2..];
        let result: parse::Result<&[u8]> = context("outer", context("magic", tag(&b"Exif"[..])))(rest);
        let err = result.unwrap_err();
        let msg = pretty_error_message(data, err);
        assert!(msg.starts_with("outer (at 0x2) => magic (at 0x2)"), "{}", msg);
    }
}
