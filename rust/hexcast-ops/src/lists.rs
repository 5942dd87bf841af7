//! List operators.

use hexcast_rt::action::ConstMediaAction;
use hexcast_rt::args::ArgsExt;
use hexcast_rt::env::CastingEnv;
use hexcast_rt::iota::Iota;
use hexcast_rt::mishap::Mishap;

/// `→ []`
pub struct OpEmptyList;

impl ConstMediaAction for OpEmptyList {
    fn argc(&self) -> usize {
        0
    }

    fn execute(&self, _args: &[Iota], _env: &dyn CastingEnv) -> Result<Vec<Iota>, Mishap> {
        Ok(vec![Iota::List(Vec::new())])
    }
}

/// `x → [x]`
pub struct OpSingleton;

impl ConstMediaAction for OpSingleton {
    fn argc(&self) -> usize {
        1
    }

    fn execute(&self, args: &[Iota], _env: &dyn CastingEnv) -> Result<Vec<Iota>, Mishap> {
        Ok(vec![Iota::List(vec![args.arg(0, self.argc())?.clone()])])
    }
}

/// `[..], x → [.., x]`
pub struct OpAppend;

impl ConstMediaAction for OpAppend {
    fn argc(&self) -> usize {
        2
    }

    fn execute(&self, args: &[Iota], _env: &dyn CastingEnv) -> Result<Vec<Iota>, Mishap> {
        let mut list = args.get_list(0, self.argc())?.to_vec();
        list.push(args.arg(1, self.argc())?.clone());
        Ok(vec![Iota::List(list)])
    }
}

/// `[a..], [b..] → [a.., b..]`
pub struct OpConcat;

impl ConstMediaAction for OpConcat {
    fn argc(&self) -> usize {
        2
    }

    fn execute(&self, args: &[Iota], _env: &dyn CastingEnv) -> Result<Vec<Iota>, Mishap> {
        let mut list = args.get_list(0, self.argc())?.to_vec();
        list.extend_from_slice(args.get_list(1, self.argc())?);
        Ok(vec![Iota::List(list)])
    }
}

/// `[..], n → list[round(n)]`, or Null when out of bounds.
pub struct OpIndex;

impl ConstMediaAction for OpIndex {
    fn argc(&self) -> usize {
        2
    }

    fn execute(&self, args: &[Iota], _env: &dyn CastingEnv) -> Result<Vec<Iota>, Mishap> {
        let list = args.get_list(0, self.argc())?;
        let index = args.get_double(1, self.argc())?.round();
        let item = if index >= 0.0 && index < list.len() as f64 {
            list[index as usize].clone()
        } else {
            Iota::Null
        };
        Ok(vec![item])
    }
}

/// `[..] → len`
pub struct OpListSize;

impl ConstMediaAction for OpListSize {
    fn argc(&self) -> usize {
        1
    }

    fn execute(&self, args: &[Iota], _env: &dyn CastingEnv) -> Result<Vec<Iota>, Mishap> {
        let list = args.get_list(0, self.argc())?;
        Ok(vec![Iota::Double(list.len() as f64)])
    }
}

/// `[a, b, c] → [c, b, a]`
pub struct OpReverse;

impl ConstMediaAction for OpReverse {
    fn argc(&self) -> usize {
        1
    }

    fn execute(&self, args: &[Iota], _env: &dyn CastingEnv) -> Result<Vec<Iota>, Mishap> {
        let mut list = args.get_list(0, self.argc())?.to_vec();
        list.reverse();
        Ok(vec![Iota::List(list)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexcast_rt::sandbox::SandboxEnv;

    fn nums(ns: &[f64]) -> Iota {
        Iota::List(ns.iter().copied().map(Iota::Double).collect())
    }

    #[test]
    fn index_rounds_and_defaults_to_null() {
        let env = SandboxEnv::new();
        let list = nums(&[10.0, 20.0, 30.0]);
        let at = |i: f64| OpIndex.execute(&[list.clone(), Iota::Double(i)], &env).unwrap();
        assert_eq!(at(1.0), vec![Iota::Double(20.0)]);
        assert_eq!(at(1.6), vec![Iota::Double(30.0)]);
        assert_eq!(at(3.0), vec![Iota::Null]);
        assert_eq!(at(-1.0), vec![Iota::Null]);
    }

    #[test]
    fn append_and_concat_keep_order() {
        let env = SandboxEnv::new();
        let appended = OpAppend
            .execute(&[nums(&[1.0]), Iota::Double(2.0)], &env)
            .unwrap();
        assert_eq!(appended, vec![nums(&[1.0, 2.0])]);

        let joined = OpConcat
            .execute(&[nums(&[1.0, 2.0]), nums(&[3.0])], &env)
            .unwrap();
        assert_eq!(joined, vec![nums(&[1.0, 2.0, 3.0])]);
    }

    #[test]
    fn concat_rejects_non_list_on_top() {
        let env = SandboxEnv::new();
        let err = OpConcat
            .execute(&[nums(&[1.0]), Iota::Double(2.0)], &env)
            .unwrap_err();
        match err {
            Mishap::InvalidIota {
                index, expected, ..
            } => {
                assert_eq!(index, 0);
                assert_eq!(expected, "list");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn size_and_reverse() {
        let env = SandboxEnv::new();
        assert_eq!(
            OpListSize.execute(&[nums(&[1.0, 2.0])], &env).unwrap(),
            vec![Iota::Double(2.0)]
        );
        assert_eq!(
            OpReverse.execute(&[nums(&[1.0, 2.0])], &env).unwrap(),
            vec![nums(&[2.0, 1.0])]
        );
    }
}
