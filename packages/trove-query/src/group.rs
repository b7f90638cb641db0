use crate::Logic;

/// Required by the grammar in front of any expression that opens with a parenthesis.
const GROUP_SIGIL: char = '~';
const AND_SEPARATOR: &str = " ";
const OR_SEPARATOR: &str = " OR ";

/// One compiled fragment and its connector to the next item. An empty fragment is a dropped item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupItem<'a> {
	pub fragment: &'a str,
	pub logic: Option<Logic>,
}

struct Group<'a> {
	fragments: Vec<&'a str>,
	logic: Logic,
}
impl<'a> Group<'a> {
	fn start(fragment: &'a str, logic: Option<Logic>) -> Self {
		Self { fragments: vec![fragment], logic: logic.unwrap_or(Logic::And) }
	}

	fn accepts(&self, logic: Option<Logic>) -> bool {
		logic.is_none_or(|logic| logic == self.logic)
	}

	fn push(mut self, fragment: &'a str) -> Self {
		self.fragments.push(fragment);

		self
	}

	fn finish(self) -> String {
		match (self.fragments.as_slice(), self.logic) {
			([single], _) => (*single).to_string(),
			(fragments, Logic::And) => fragments.join(AND_SEPARATOR),
			(fragments, Logic::Or) => format!("{GROUP_SIGIL}({})", fragments.join(OR_SEPARATOR)),
		}
	}
}

/// Folds fragments into top-level groups, starting a new group whenever the connector changes.
///
/// The connector on the last non-empty item is ignored since nothing follows it.
pub fn group(items: &[GroupItem<'_>]) -> Vec<String> {
	let live = items.iter().filter(|item| !item.fragment.is_empty()).collect::<Vec<_>>();
	let last = live.len().saturating_sub(1);
	let (mut groups, current) = live.into_iter().enumerate().fold(
		(Vec::new(), None::<Group>),
		|(mut groups, current), (position, item)| {
			let logic = if position == last { None } else { item.logic };
			let next = match current {
				Some(group) if group.accepts(logic) => group.push(item.fragment),
				Some(group) => {
					groups.push(group.finish());

					Group::start(item.fragment, logic)
				},
				None => Group::start(item.fragment, logic),
			};

			(groups, Some(next))
		},
	);

	groups.extend(current.map(Group::finish));

	groups
}

#[cfg(test)]
mod tests {
	use crate::{
		Logic,
		group::{GroupItem, group},
	};

	fn item(fragment: &str, logic: Option<Logic>) -> GroupItem<'_> {
		GroupItem { fragment, logic }
	}

	#[test]
	fn single_item_is_returned_unchanged() {
		assert_eq!(group(&[item("#book", Some(Logic::Or))]), vec!["#book"]);
	}

	#[test]
	fn or_pair_is_wrapped_with_sigil() {
		assert_eq!(
			group(&[item("#book", Some(Logic::Or)), item("#author", None)]),
			vec!["~(#book OR #author)"]
		);
	}

	#[test]
	fn and_pair_is_space_joined() {
		assert_eq!(group(&[item("#book", Some(Logic::And)), item("#author", None)]), vec![
			"#book #author"
		]);
	}

	#[test]
	fn connector_change_starts_new_group() {
		assert_eq!(
			group(&[item("A", Some(Logic::And)), item("B", Some(Logic::Or)), item("C", None)]),
			vec!["A", "~(B OR C)"]
		);
		assert_eq!(
			group(&[item("A", Some(Logic::Or)), item("B", Some(Logic::And)), item("C", None)]),
			vec!["A", "B C"]
		);
	}

	#[test]
	fn alternating_run_yields_one_group_per_boundary() {
		let items = [
			item("A", Some(Logic::Or)),
			item("B", Some(Logic::Or)),
			item("C", Some(Logic::And)),
			item("D", Some(Logic::Or)),
			item("E", Some(Logic::Or)),
			item("F", None),
		];

		assert_eq!(group(&items), vec!["~(A OR B)", "C", "~(D OR E OR F)"]);
	}

	#[test]
	fn dropped_items_do_not_affect_boundaries() {
		let items = [
			item("A", Some(Logic::Or)),
			item("", Some(Logic::And)),
			item("B", Some(Logic::Or)),
			item("", None),
		];

		assert_eq!(group(&items), vec!["~(A OR B)"]);
	}

	#[test]
	fn trailing_logic_is_ignored() {
		let with_or = [item("A", Some(Logic::And)), item("B", Some(Logic::Or))];
		let with_and = [item("A", Some(Logic::And)), item("B", Some(Logic::And))];
		let without = [item("A", Some(Logic::And)), item("B", None)];

		assert_eq!(group(&with_or), group(&without));
		assert_eq!(group(&with_and), group(&without));
	}

	#[test]
	fn empty_input_yields_no_groups() {
		assert!(group(&[]).is_empty());
		assert!(group(&[item("", Some(Logic::Or))]).is_empty());
	}
}
